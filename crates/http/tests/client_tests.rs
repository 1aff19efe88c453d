//! Integration tests for the Chatdesk HTTP client

use chatdesk_http::types::{Server, ServerListQuery};
use chatdesk_http::{ApiClient, ClientConfig, ClientError, MemoryTokenStore, Session, TokenPair};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_json(id: u64, name: &str, category: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "owner": 1,
        "category": category,
        "description": null,
        "channel_server": []
    })
}

#[tokio::test]
async fn test_client_builder() {
    let client = ApiClient::builder()
        .base_url("http://localhost:8000/api/")
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000/api");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = ApiClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_client_builder_rejects_invalid_base_url() {
    let result = ApiClient::builder().base_url("not a url").build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_from_config_uses_custom_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a1", "refresh": "r1"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        base_url: mock_server.uri(),
        token_path: "/auth/login/".to_string(),
        ..ClientConfig::default()
    };
    let client = ApiClient::from_config(&config, Arc::new(Session::in_memory())).unwrap();

    client.login("alice", "secret").await.unwrap();
    assert!(client.session().is_authenticated().await.unwrap());
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/server/category/"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Gaming", "description": "Play together"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::with_pair(
        TokenPair::new("access-1", "refresh-1"),
    ))));
    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .session(session)
        .build()
        .unwrap();

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Gaming");
    assert_eq!(categories[0].description.as_deref(), Some("Play together"));
}

#[tokio::test]
async fn test_list_servers_sends_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/server/select/"))
        .and(query_param("category", "Gaming"))
        .and(query_param("qty", "2"))
        .and(query_param("with_num_members", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 4,
                "name": "Speedrunners",
                "owner": 2,
                "category": "Gaming",
                "description": "Any% only",
                "num_members": 12,
                "channel_server": [
                    {"id": 9, "name": "routes", "owner": 2, "topic": "tech", "server": 4}
                ]
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let query = ServerListQuery::default()
        .category("Gaming")
        .qty(2)
        .with_num_members();

    let servers = client.list_servers(&query).await.unwrap();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].num_members, Some(12));
    assert_eq!(servers[0].channel_server[0].topic, "tech");
}

#[tokio::test]
async fn test_servers_resource_tracks_filtered_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/server/select/"))
        .and(query_param("by_serverid", "7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([server_json(7, "Chess", "Board")])),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let servers = client.servers_resource(&ServerListQuery::default().by_serverid(7));
    assert_eq!(servers.path(), "/server/select/?by_serverid=7");

    servers.fetch_data().await.unwrap();
    let data: Vec<Server> = servers.data();
    assert_eq!(data[0].name, "Chess");
}

#[tokio::test]
async fn test_login_stores_token_pair() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a1", "refresh": "r1"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    client.login("alice", "secret").await.unwrap();

    assert_eq!(
        client.session().tokens().await.unwrap(),
        Some(TokenPair::new("a1", "r1"))
    );

    client.logout().await.unwrap();
    assert!(client.session().tokens().await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_rejection_is_not_refreshed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("No active account"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "x"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let result = client.login("alice", "wrong").await;

    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));
    assert!(!client.session().is_authenticated().await.unwrap());
}

#[tokio::test]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;

    // Test 404 Not Found
    Mock::given(method("GET"))
        .and(path("/server/category/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();

    let result = client.list_categories().await;
    match result {
        Err(ClientError::NotFound(message)) => assert_eq!(message, "Not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_shape_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/server/category/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "not a list"})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();

    let result = client.list_categories().await;
    assert!(matches!(result, Err(ClientError::Serialization(_))));
}
