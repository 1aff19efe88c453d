//! Authentication API client methods

use reqwest::Method;

use super::{ApiClient, ClientError};
use super::token_store::TokenPair;
use crate::types::{LoginRequest, LoginResponse};

impl ApiClient {
    /// Exchange username and password for a token pair and store it
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let req = self
            .request(Method::POST, self.token_path())
            .json(&LoginRequest { username, password });
        let tokens: LoginResponse = self.execute_public(req).await?;

        self.session()
            .set_tokens(TokenPair::new(tokens.access, tokens.refresh))
            .await?;
        info!(username, "logged in");
        Ok(())
    }

    /// Forget the stored token pair
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.session().clear().await?;
        info!("logged out");
        Ok(())
    }
}
