//! Chatdesk API client

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod resource;
pub mod session;
pub mod token_store;

pub use config::ClientConfig;

use error::ClientError;
use interceptor::AuthInterceptor;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use session::Session;
use std::sync::Arc;
use std::time::Duration;

/// Chatdesk API client
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    token_path: String,
    client: Client,
    interceptor: AuthInterceptor,
}

impl ApiClient {
    /// Create a new client with default configuration and an in-memory session
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from loaded settings
    pub fn from_config(config: &ClientConfig, session: Arc<Session>) -> Result<Self, ClientError> {
        let mut builder = Self::builder()
            .base_url(&config.base_url)
            .token_path(&config.token_path)
            .refresh_path(&config.refresh_path)
            .session(session);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session whose credentials this client sends
    pub fn session(&self) -> &Arc<Session> {
        self.interceptor.session()
    }

    /// Create a request builder for `<base_url><path>`
    ///
    /// Credentials are attached when the request is executed, not here.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request through the auth interceptor and decode the JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.interceptor.send(request).await?;
        decode(response).await
    }

    /// Execute a request without attaching credentials
    pub(crate) async fn execute_public<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        decode(response).await
    }

    pub(crate) fn token_path(&self) -> &str {
        &self.token_path
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    } else {
        let message = response.text().await.unwrap_or_else(|_| status.to_string());
        Err(ClientError::from_status(status, message))
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    token_path: Option<String>,
    refresh_path: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    session: Option<Arc<Session>>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the login endpoint path
    pub fn token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Set the token refresh endpoint path
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Set the request timeout
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Share an existing session
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url}: {e}")))?;

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("chatdesk-client/{}", env!("CARGO_PKG_VERSION")));
        client_builder = client_builder.user_agent(user_agent);

        let client = client_builder.build()?;
        let session = self.session.unwrap_or_default();
        let refresh_path = self
            .refresh_path
            .unwrap_or_else(|| config::DEFAULT_REFRESH_PATH.to_string());
        let interceptor =
            AuthInterceptor::new(client.clone(), base_url.clone(), refresh_path, session);

        Ok(ApiClient {
            base_url,
            token_path: self
                .token_path
                .unwrap_or_else(|| config::DEFAULT_TOKEN_PATH.to_string()),
            client,
            interceptor,
        })
    }
}
