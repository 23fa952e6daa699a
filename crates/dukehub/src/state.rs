//! Explicitly constructed service components.
//!
//! Every cache instance is owned here and injected where needed; there
//! is no module-level cache state. The directory resolver is shared with
//! the scholar resolver, which delegates free-text identity resolution
//! to it.

use std::sync::Arc;

use crate::calendar::EventStore;
use crate::config::Config;
use crate::directory::DirectoryResolver;
use crate::scholars::ScholarResolver;
use crate::upstream::{DirectoryClient, EventsFeedClient, ScholarsClient};

/// The three resolver components wired over live HTTP clients.
#[derive(Clone)]
pub struct Services {
    pub events: Arc<EventStore<EventsFeedClient>>,
    pub directory: Arc<DirectoryResolver<DirectoryClient>>,
    pub scholars: Arc<ScholarResolver<ScholarsClient, DirectoryClient>>,
}

impl Services {
    /// Builds the full component graph from configuration.
    ///
    /// The event store keeps its fixed one-hour TTL; the directory and
    /// scholar caches share the configured reference TTL.
    pub fn from_config(config: &Config) -> Self {
        let events = Arc::new(EventStore::new(EventsFeedClient::new(
            &config.calendar_api_url,
        )));

        let directory = Arc::new(DirectoryResolver::new(
            DirectoryClient::new(&config.directory_api_url, &config.directory_api_key),
            config.reference_cache_ttl(),
        ));

        let scholars = Arc::new(ScholarResolver::new(
            ScholarsClient::new(&config.scholars_api_url),
            directory.clone(),
            config.reference_cache_ttl(),
        ));

        Self {
            events,
            directory,
            scholars,
        }
    }
}
