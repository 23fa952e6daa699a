use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::Result;

/// The calendar events feed.
///
/// The feed returns either a bare array of event records or an object
/// wrapping that array under an `events` key; callers must handle both
/// shapes.
#[async_trait]
pub trait EventsFeed: Send + Sync {
    /// Fetches every event from now through `future_days` ahead.
    async fn fetch(&self, future_days: u32) -> Result<Value>;
}

/// The directory/LDAP lookup service.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Searches the directory for people matching a free-text query.
    async fn search(&self, query: &str) -> Result<Vec<Value>>;

    /// Fetches the full record behind a directory key.
    async fn person_details(&self, ldapkey: &str) -> Result<Value>;
}

/// The scholars profile service, keyed by canonical numeric id.
#[async_trait]
pub trait ScholarsApi: Send + Sync {
    /// Fetches up to `count` publications for a scholar.
    async fn publications(&self, duid: &str, count: u32) -> Result<Value>;

    /// Fetches up to `count` grants for a scholar.
    async fn grants(&self, duid: &str, count: u32) -> Result<Value>;

    /// Fetches the complete profile for a scholar.
    async fn profile(&self, duid: &str) -> Result<Value>;
}

#[async_trait]
impl<T> EventsFeed for Arc<T>
where
    T: EventsFeed + ?Sized,
{
    async fn fetch(&self, future_days: u32) -> Result<Value> {
        (**self).fetch(future_days).await
    }
}

#[async_trait]
impl<T> DirectoryApi for Arc<T>
where
    T: DirectoryApi + ?Sized,
{
    async fn search(&self, query: &str) -> Result<Vec<Value>> {
        (**self).search(query).await
    }

    async fn person_details(&self, ldapkey: &str) -> Result<Value> {
        (**self).person_details(ldapkey).await
    }
}

#[async_trait]
impl<T> ScholarsApi for Arc<T>
where
    T: ScholarsApi + ?Sized,
{
    async fn publications(&self, duid: &str, count: u32) -> Result<Value> {
        (**self).publications(duid, count).await
    }

    async fn grants(&self, duid: &str, count: u32) -> Result<Value> {
        (**self).grants(duid, count).await
    }

    async fn profile(&self, duid: &str) -> Result<Value> {
        (**self).profile(duid).await
    }
}
