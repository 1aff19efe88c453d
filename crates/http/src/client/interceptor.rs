//! Bearer-token request pipeline with refresh-and-retry
//!
//! Every request leaving an [`ApiClient`](super::ApiClient) passes through
//! [`AuthInterceptor::send`]:
//!
//! 1. the current access token is attached as a bearer credential;
//! 2. on a 401, the refresh token is exchanged for a new access token and the
//!    request is replayed exactly once with it;
//! 3. if the refresh fails, the session is cleared and the original 401
//!    response is handed back to the caller; if the refreshed pair cannot be
//!    stored, the session is cleared as well and the storage error returned.
//!
//! Refreshes are serialized on the session's refresh lock. A request that was
//! rejected with a token someone else has already replaced skips the network
//! refresh and replays with the current token.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;

use super::error::ClientError;
use super::session::Session;
use super::token_store::TokenPair;
use crate::types::{RefreshRequest, RefreshResponse};

/// Attaches credentials and recovers from expired access tokens
#[derive(Clone, Debug)]
pub struct AuthInterceptor {
    client: Client,
    base_url: String,
    refresh_path: String,
    session: Arc<Session>,
}

impl AuthInterceptor {
    pub(crate) fn new(
        client: Client,
        base_url: String,
        refresh_path: String,
        session: Arc<Session>,
    ) -> Self {
        Self {
            client,
            base_url,
            refresh_path,
            session,
        }
    }

    /// The session whose credentials are attached
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Dispatch a request, refreshing and replaying once on 401
    ///
    /// Non-401 responses are returned untouched, whatever their status.
    /// Requests whose body cannot be cloned are sent once without the retry.
    /// A credential store failure during the refresh is returned as
    /// [`ClientError::Storage`] rather than as the original 401.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let replay = request.try_clone();
        let access = self.session.access_token().await?;

        let response = authorize(request, access.as_deref()).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(replay) = replay else {
            debug!("request body cannot be replayed, skipping token refresh");
            return Ok(response);
        };

        match self.refresh_after_rejection(access.as_deref()).await {
            Ok(fresh) => {
                debug!("replaying request with refreshed access token");
                Ok(authorize(replay, Some(&fresh)).send().await?)
            }
            Err(err @ ClientError::Storage(_)) => Err(err),
            Err(err) => {
                warn!(error = %err, "token refresh failed, returning original 401");
                Ok(response)
            }
        }
    }

    /// Obtain an access token to replace `rejected`
    async fn refresh_after_rejection(&self, rejected: Option<&str>) -> Result<String, ClientError> {
        let _guard = self.session.lock_refresh().await;

        let Some(pair) = self.session.tokens().await? else {
            return Err(ClientError::AuthenticationFailed(
                "no stored credentials to refresh".to_string(),
            ));
        };

        if rejected != Some(pair.access_token.as_str()) {
            debug!("access token already rotated by a concurrent request");
            return Ok(pair.access_token);
        }

        let refreshed = match self.request_refresh(&pair.refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                self.expire_session().await;
                return Err(err);
            }
        };

        let updated = TokenPair {
            access_token: refreshed.access,
            refresh_token: refreshed.refresh.unwrap_or(pair.refresh_token),
        };
        let access = updated.access_token.clone();
        if let Err(err) = self.session.set_tokens(updated).await {
            // The server may already have rotated the stored refresh token
            error!(error = %err, "failed to store refreshed tokens");
            self.expire_session().await;
            return Err(err);
        }
        info!("access token refreshed");
        Ok(access)
    }

    /// Drop both credentials and tell the session owner to log in again
    async fn expire_session(&self) {
        if let Err(err) = self.session.clear().await {
            error!(error = %err, "failed to clear session");
        }
        warn!("session cleared, login required");
        self.session.notify_expired();
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError> {
        let url = format!("{}{}", self.base_url, self.refresh_path);
        let response = self
            .client
            .post(url)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

fn authorize(request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
    match access_token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}
