//! Wire types shared by the client and its consumers

use serde::{Deserialize, Serialize};

/// Server category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Text channel belonging to a server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: u64,
    /// Channel name, always lowercase
    pub name: String,
    /// Account ID of the owner
    pub owner: u64,
    pub topic: String,
    /// ID of the server the channel belongs to
    pub server: u64,
}

/// Chat server as returned by the server list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: u64,
    pub name: String,
    /// Account ID of the owner
    pub owner: u64,
    /// Category name
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Member count, only present when requested with `with_num_members`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_members: Option<u64>,
    #[serde(default)]
    pub channel_server: Vec<Channel>,
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response body
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

/// Refresh request body
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Refresh response body
///
/// Servers that rotate refresh tokens include a new `refresh` value.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Filters accepted by the server list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerListQuery {
    /// Only servers in the category with this name
    pub category: Option<String>,
    /// Maximum number of servers returned
    pub qty: Option<u32>,
    /// Only servers the authenticated user is a member of
    pub by_user: bool,
    /// Only the server with this ID
    pub by_serverid: Option<u64>,
    /// Include `num_members` on every server
    pub with_num_members: bool,
}

impl ServerListQuery {
    /// Filter by category name
    #[must_use]
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    /// Limit the number of servers returned
    #[must_use]
    pub const fn qty(mut self, qty: u32) -> Self {
        self.qty = Some(qty);
        self
    }

    /// Only servers the caller is a member of (requires a session)
    #[must_use]
    pub const fn by_user(mut self) -> Self {
        self.by_user = true;
        self
    }

    /// Select a single server by ID
    #[must_use]
    pub const fn by_serverid(mut self, id: u64) -> Self {
        self.by_serverid = Some(id);
        self
    }

    /// Ask the server to annotate member counts
    #[must_use]
    pub const fn with_num_members(mut self) -> Self {
        self.with_num_members = true;
        self
    }

    /// Render the query string, without the leading `?`
    ///
    /// Returns an empty string when no filter is set. Flags are only emitted
    /// when enabled.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(category) = &self.category {
            serializer.append_pair("category", category);
        }
        if let Some(qty) = self.qty {
            serializer.append_pair("qty", &qty.to_string());
        }
        if self.by_user {
            serializer.append_pair("by_user", "true");
        }
        if let Some(id) = self.by_serverid {
            serializer.append_pair("by_serverid", &id.to_string());
        }
        if self.with_num_members {
            serializer.append_pair("with_num_members", "true");
        }
        serializer.finish()
    }

    /// Append this query to a relative path
    pub fn apply_to(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query_leaves_path_untouched() {
        let query = ServerListQuery::default();
        assert_eq!(query.to_query_string(), "");
        assert_eq!(query.apply_to("/server/select/"), "/server/select/");
    }

    #[test]
    fn test_query_encodes_filters_in_order() {
        let query = ServerListQuery::default()
            .category("Board Games")
            .qty(10)
            .by_user()
            .with_num_members();
        assert_eq!(
            query.apply_to("/server/select/"),
            "/server/select/?category=Board+Games&qty=10&by_user=true&with_num_members=true"
        );
    }

    #[test]
    fn test_query_by_server_id() {
        let query = ServerListQuery::default().by_serverid(42);
        assert_eq!(query.to_query_string(), "by_serverid=42");
    }

    #[test]
    fn test_server_without_member_count() {
        let server: Server = serde_json::from_value(json!({
            "id": 1,
            "name": "Rustaceans",
            "owner": 3,
            "category": "Programming",
            "description": null,
            "channel_server": [
                {"id": 7, "name": "general", "owner": 3, "topic": "chat", "server": 1}
            ]
        }))
        .unwrap();
        assert_eq!(server.num_members, None);
        assert_eq!(server.channel_server.len(), 1);
        assert_eq!(server.channel_server[0].name, "general");
    }

    #[test]
    fn test_refresh_response_without_rotation() {
        let response: RefreshResponse = serde_json::from_str(r#"{"access":"a2"}"#).unwrap();
        assert_eq!(response.access, "a2");
        assert!(response.refresh.is_none());
    }
}
