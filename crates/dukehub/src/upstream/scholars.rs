use async_trait::async_trait;
use serde_json::Value;

use dukehub_core::upstream::{Result, ScholarsApi};

use super::{decode_json, transport_error};

/// HTTP client for the scholars profile widgets API.
///
/// Result size is part of the resource path (`.../publications/10.json`);
/// the canonical id rides along as the `uri` query parameter.
#[derive(Debug, Clone)]
pub struct ScholarsClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScholarsClient {
    /// Creates a client for the scholars service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_widget(&self, path: &str, duid: &str) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("uri", duid)])
            .send()
            .await
            .map_err(transport_error)?;
        decode_json(response).await
    }
}

#[async_trait]
impl ScholarsApi for ScholarsClient {
    async fn publications(&self, duid: &str, count: u32) -> Result<Value> {
        self.get_widget(&format!("people/publications/{count}.json"), duid)
            .await
    }

    async fn grants(&self, duid: &str, count: u32) -> Result<Value> {
        self.get_widget(&format!("people/grants/{count}.json"), duid)
            .await
    }

    async fn profile(&self, duid: &str) -> Result<Value> {
        self.get_widget("people/complete/1.json", duid).await
    }
}
