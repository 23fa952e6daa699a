use async_trait::async_trait;
use serde_json::Value;

use dukehub_core::upstream::{EventsFeed, Result};

use super::{decode_json, transport_error};

/// HTTP client for the calendar events feed.
#[derive(Debug, Clone)]
pub struct EventsFeedClient {
    client: reqwest::Client,
    api_url: String,
}

impl EventsFeedClient {
    /// Creates a client for the feed at `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl EventsFeed for EventsFeedClient {
    async fn fetch(&self, future_days: u32) -> Result<Value> {
        let future_days = future_days.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("future_days", future_days.as_str()),
                ("feed_type", "simple"),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        decode_json(response).await
    }
}
