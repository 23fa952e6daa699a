use async_trait::async_trait;
use serde_json::Value;

use dukehub_core::upstream::{DirectoryApi, Result};

use super::{decode_json, transport_error};

/// HTTP client for the directory/LDAP lookup service.
///
/// The upstream authenticates with an access token passed as a query
/// parameter on every call.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl DirectoryClient {
    /// Creates a client for the directory service at `base_url`.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl DirectoryApi for DirectoryClient {
    async fn search(&self, query: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("access_token", self.access_token.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        decode_json(response).await
    }

    async fn person_details(&self, ldapkey: &str) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, ldapkey);
        let response = self
            .client
            .get(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        decode_json(response).await
    }
}
