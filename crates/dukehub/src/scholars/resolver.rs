//! Cached scholar profile lookups with chained identity resolution.
//!
//! Callers pass either a canonical numeric duid or a free-text query
//! (name, NetID). Non-numeric input is resolved through the directory
//! resolver's search path before any scholars call; the directory keeps
//! its own cache of that delegation, independent of the scholar caches
//! here. Publications and grants are cached per (duid, count) pair, so
//! asking for a different count is a cache miss even for the same
//! person; profile details are cached per duid alone.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use dukehub_core::cache::TtlCache;
use dukehub_core::scholars::{
    grant_from_item, publication_from_item, scholar_from_item, Grant, GrantsResponse, Publication,
    PublicationsResponse, ScholarDetailsResponse,
};
use dukehub_core::upstream::{DirectoryApi, ScholarsApi, UpstreamError};

use crate::directory::DirectoryResolver;

use super::error::ScholarError;

/// True when the input can be used directly as a canonical scholars id.
fn is_canonical_duid(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|byte| byte.is_ascii_digit())
}

/// Pulls the item array out of a scholars payload, accepting both a bare
/// array and an `{"items": [...]}` wrapper.
fn unwrap_items(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut wrapper) => match wrapper.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Cached resolver over the scholars profile upstream.
pub struct ScholarResolver<S, D> {
    api: S,
    directory: Arc<DirectoryResolver<D>>,
    publications_cache: TtlCache<(String, u32), PublicationsResponse>,
    grants_cache: TtlCache<(String, u32), GrantsResponse>,
    details_cache: TtlCache<String, ScholarDetailsResponse>,
}

impl<S, D> ScholarResolver<S, D>
where
    S: ScholarsApi,
    D: DirectoryApi,
{
    /// Creates a resolver delegating identity resolution to `directory`.
    pub fn new(api: S, directory: Arc<DirectoryResolver<D>>, cache_ttl: Duration) -> Self {
        Self {
            api,
            directory,
            publications_cache: TtlCache::new(cache_ttl),
            grants_cache: TtlCache::new(cache_ttl),
            details_cache: TtlCache::new(cache_ttl),
        }
    }

    /// Resolves free-text input to a duid through the directory search.
    ///
    /// Returns `None` when the search errored or matched nobody. When
    /// several people match, the first result wins; upstream order is
    /// the only ranking applied, so same-named people resolve to
    /// whichever the directory lists first.
    async fn find_duid_from_directory(&self, query: &str) -> Option<String> {
        let search = self.directory.search(query).await;
        if search.is_error() || search.results.is_empty() {
            tracing::warn!(%query, "no directory results for scholar resolution");
            return None;
        }
        Some(search.results[0].duid.clone())
    }

    async fn resolve_duid(&self, duid_or_query: &str) -> Option<String> {
        if is_canonical_duid(duid_or_query) {
            return Some(duid_or_query.to_string());
        }
        self.find_duid_from_directory(duid_or_query).await
    }

    /// Up to `count` publications for a scholar, by duid or free text.
    pub async fn publications(&self, duid_or_query: &str, count: u32) -> PublicationsResponse {
        let Some(duid) = self.resolve_duid(duid_or_query).await else {
            return PublicationsResponse::error(
                duid_or_query,
                format!("Could not find a person matching: {duid_or_query}"),
            );
        };

        let result = self
            .publications_cache
            .get_or_refresh((duid.clone(), count), || async {
                let payload = self.api.publications(&duid, count).await?;
                let publications: Vec<Publication> = unwrap_items(payload)
                    .iter()
                    .map(publication_from_item)
                    .collect();
                tracing::debug!(%duid, count = publications.len(), "publications fetched");
                Ok::<_, UpstreamError>(PublicationsResponse::ok(&duid, publications))
            })
            .await;

        match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%duid, error = %err, "publications query failed");
                PublicationsResponse::error(&duid, format!("publications query failed: {err}"))
            }
        }
    }

    /// Up to `count` grants for a scholar, by duid or free text.
    pub async fn grants(&self, duid_or_query: &str, count: u32) -> GrantsResponse {
        let Some(duid) = self.resolve_duid(duid_or_query).await else {
            return GrantsResponse::error(
                duid_or_query,
                format!("Could not find a person matching: {duid_or_query}"),
            );
        };

        let result = self
            .grants_cache
            .get_or_refresh((duid.clone(), count), || async {
                let payload = self.api.grants(&duid, count).await?;
                let grants: Vec<Grant> =
                    unwrap_items(payload).iter().map(grant_from_item).collect();
                tracing::debug!(%duid, count = grants.len(), "grants fetched");
                Ok::<_, UpstreamError>(GrantsResponse::ok(&duid, grants))
            })
            .await;

        match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%duid, error = %err, "grants query failed");
                GrantsResponse::error(&duid, format!("grants query failed: {err}"))
            }
        }
    }

    /// Complete profile for a scholar, by duid or free text.
    pub async fn details(&self, duid_or_query: &str) -> ScholarDetailsResponse {
        let Some(duid) = self.resolve_duid(duid_or_query).await else {
            return ScholarDetailsResponse::error(
                duid_or_query,
                format!("Could not find a person matching: {duid_or_query}"),
            );
        };

        let result = self
            .details_cache
            .get_or_refresh(duid.clone(), || async {
                let payload = self.api.profile(&duid).await?;
                let items = unwrap_items(payload);
                let Some(item) = items.first() else {
                    return Err(ScholarError::NoDetails);
                };
                Ok(ScholarDetailsResponse::ok(
                    &duid,
                    scholar_from_item(&duid, item),
                ))
            })
            .await;

        match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%duid, error = %err, "scholar details query failed");
                ScholarDetailsResponse::error(&duid, err.to_string())
            }
        }
    }
}
