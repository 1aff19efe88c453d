//! Server and category endpoints

use reqwest::Method;

use super::resource::ResourceClient;
use super::{ApiClient, ClientError};
use crate::types::{Category, Server, ServerListQuery};

/// Category list endpoint
pub const CATEGORIES_PATH: &str = "/server/category/";
/// Server list endpoint
pub const SERVERS_PATH: &str = "/server/select/";

impl ApiClient {
    /// List all server categories
    pub async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        let request = self.request(Method::GET, CATEGORIES_PATH);
        self.execute(request).await
    }

    /// List servers matching the query
    pub async fn list_servers(&self, query: &ServerListQuery) -> Result<Vec<Server>, ClientError> {
        let request = self.request(Method::GET, &query.apply_to(SERVERS_PATH));
        self.execute(request).await
    }

    /// Stateful handle on the category list
    pub fn categories_resource(&self) -> ResourceClient<Category> {
        self.resource(CATEGORIES_PATH, Vec::new())
    }

    /// Stateful handle on a filtered server list
    pub fn servers_resource(&self, query: &ServerListQuery) -> ResourceClient<Server> {
        self.resource(query.apply_to(SERVERS_PATH), Vec::new())
    }
}
