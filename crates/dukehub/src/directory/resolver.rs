//! Cached directory search and person lookups.
//!
//! The only component that talks to the person-lookup upstream. Search
//! results are cached per literal query string (case-sensitive, no
//! normalization) and detail lookups per directory key. Upstream
//! failures never cross this boundary as errors; they come back as
//! error-tagged responses so callers can tell "zero matches" from
//! "upstream failure".

use std::time::Duration;

use dukehub_core::cache::TtlCache;
use dukehub_core::directory::{
    DetailedPerson, DirectoryPerson, PersonDetailsResponse, SearchResponse,
};
use dukehub_core::upstream::{DirectoryApi, UpstreamError};

/// Cached resolver over the directory/LDAP upstream.
pub struct DirectoryResolver<D> {
    api: D,
    search_cache: TtlCache<String, SearchResponse>,
    person_cache: TtlCache<String, PersonDetailsResponse>,
}

impl<D> DirectoryResolver<D>
where
    D: DirectoryApi,
{
    /// Creates a resolver whose caches stay fresh for `cache_ttl`.
    pub fn new(api: D, cache_ttl: Duration) -> Self {
        Self {
            api,
            search_cache: TtlCache::new(cache_ttl),
            person_cache: TtlCache::new(cache_ttl),
        }
    }

    /// Searches the directory for people matching `query`.
    ///
    /// Raw records failing validation are dropped from the result set
    /// with a warning; the rest of the batch goes through. Only
    /// successful responses are cached.
    pub async fn search(&self, query: &str) -> SearchResponse {
        let result = self
            .search_cache
            .get_or_refresh(query.to_string(), || async {
                let records = self.api.search(query).await?;
                let mut results = Vec::new();
                for record in records {
                    match serde_json::from_value::<DirectoryPerson>(record) {
                        Ok(person) => results.push(person),
                        Err(err) => {
                            tracing::warn!(
                                %query,
                                error = %err,
                                "dropping directory record that failed validation"
                            );
                        }
                    }
                }
                tracing::debug!(%query, count = results.len(), "directory search fetched");
                Ok::<_, UpstreamError>(SearchResponse::ok(query, results))
            })
            .await;

        match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%query, error = %err, "directory search failed");
                SearchResponse::error(query, format!("directory search failed: {err}"))
            }
        }
    }

    /// Fetches the detailed record behind a directory key.
    ///
    /// A record that fails validation is treated like an upstream
    /// failure: error-tagged response, nothing cached.
    pub async fn person_details(&self, ldapkey: &str) -> PersonDetailsResponse {
        let result = self
            .person_cache
            .get_or_refresh(ldapkey.to_string(), || async {
                let record = self.api.person_details(ldapkey).await?;
                let person = serde_json::from_value::<DetailedPerson>(record)
                    .map_err(|err| UpstreamError::Decode(err.to_string()))?;
                Ok::<_, UpstreamError>(PersonDetailsResponse::ok(ldapkey, person))
            })
            .await;

        match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%ldapkey, error = %err, "person details lookup failed");
                PersonDetailsResponse::error(ldapkey, format!("person lookup failed: {err}"))
            }
        }
    }

    /// Searches by NetID. Alias of [`DirectoryResolver::search`] over the
    /// same cache.
    pub async fn search_by_netid(&self, netid: &str) -> SearchResponse {
        self.search(netid).await
    }

    /// Searches by name. Alias of [`DirectoryResolver::search`] over the
    /// same cache.
    pub async fn search_by_name(&self, name: &str) -> SearchResponse {
        self.search(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use dukehub_core::upstream::Result as UpstreamResult;

    const TEST_TTL: Duration = Duration::from_secs(60);

    struct MockDirectoryApi {
        search_results: std::sync::Mutex<Vec<Value>>,
        person_record: std::sync::Mutex<Value>,
        search_calls: AtomicUsize,
        details_calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl MockDirectoryApi {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                search_results: std::sync::Mutex::new(Vec::new()),
                person_record: std::sync::Mutex::new(Value::Null),
                search_calls: AtomicUsize::new(0),
                details_calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            })
        }

        fn set_search_results(&self, results: Vec<Value>) {
            *self.search_results.lock().unwrap() = results;
        }

        fn set_person_record(&self, record: Value) {
            *self.person_record.lock().unwrap() = record;
        }

        fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DirectoryApi for MockDirectoryApi {
        async fn search(&self, _query: &str) -> UpstreamResult<Vec<Value>> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(UpstreamError::Status(502));
            }
            Ok(self.search_results.lock().unwrap().clone())
        }

        async fn person_details(&self, _ldapkey: &str) -> UpstreamResult<Value> {
            self.details_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(UpstreamError::Status(502));
            }
            Ok(self.person_record.lock().unwrap().clone())
        }
    }

    fn person(netid: &str) -> Value {
        json!({
            "ldapkey": format!("key-{netid}"),
            "sn": "Smith",
            "givenName": "Jane",
            "duid": "0123456",
            "netid": netid,
            "display_name": "Jane Smith"
        })
    }

    #[tokio::test]
    async fn test_search_validates_and_counts_records() {
        let api = MockDirectoryApi::new();
        api.set_search_results(vec![
            person("js1"),
            // Missing netid: dropped, batch continues.
            json!({
                "ldapkey": "key-x",
                "sn": "Smith",
                "givenName": "John",
                "duid": "0123457",
                "display_name": "John Smith"
            }),
            person("js2"),
        ]);
        let resolver = DirectoryResolver::new(api.clone(), TEST_TTL);

        let response = resolver.search("Smith").await;
        assert_eq!(response.count, 2);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.query, "Smith");
        assert!(!response.is_error());
    }

    #[tokio::test]
    async fn test_search_zero_matches_is_not_an_error() {
        let api = MockDirectoryApi::new();
        let resolver = DirectoryResolver::new(api.clone(), TEST_TTL);

        let response = resolver.search("Nobody").await;
        assert_eq!(response.count, 0);
        assert!(!response.is_error());
    }

    #[tokio::test]
    async fn test_search_is_cached_within_ttl() {
        let api = MockDirectoryApi::new();
        api.set_search_results(vec![person("js1")]);
        let resolver = DirectoryResolver::new(api.clone(), TEST_TTL);

        let first = resolver.search("Smith").await;
        let second = resolver.search("Smith").await;
        assert_eq!(first, second);
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_cache_keys_are_case_sensitive() {
        let api = MockDirectoryApi::new();
        api.set_search_results(vec![person("js1")]);
        let resolver = DirectoryResolver::new(api.clone(), TEST_TTL);

        resolver.search("Smith").await;
        resolver.search("smith").await;
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_error_tagged_and_not_cached() {
        let api = MockDirectoryApi::new();
        api.set_fail(true);
        let resolver = DirectoryResolver::new(api.clone(), TEST_TTL);

        let response = resolver.search("Smith").await;
        assert!(response.is_error());
        assert!(response.results.is_empty());
        assert_eq!(response.query, "Smith");

        // Failure was not cached; a recovered upstream serves the next read.
        api.set_fail(false);
        api.set_search_results(vec![person("js1")]);
        let response = resolver.search("Smith").await;
        assert!(!response.is_error());
        assert_eq!(response.count, 1);
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_aliases_share_the_search_cache() {
        let api = MockDirectoryApi::new();
        api.set_search_results(vec![person("jdoe")]);
        let resolver = DirectoryResolver::new(api.clone(), TEST_TTL);

        resolver.search_by_netid("jdoe").await;
        resolver.search_by_name("jdoe").await;
        resolver.search("jdoe").await;
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_person_details_is_cached_by_ldapkey() {
        let api = MockDirectoryApi::new();
        api.set_person_record(person("js1"));
        let resolver = DirectoryResolver::new(api.clone(), TEST_TTL);

        let first = resolver.person_details("key-js1").await;
        let second = resolver.person_details("key-js1").await;
        assert!(!first.is_error());
        assert_eq!(first.person.as_ref().unwrap().netid, "js1");
        assert_eq!(first, second);
        assert_eq!(api.details_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_person_details_validation_failure_is_error_tagged() {
        let api = MockDirectoryApi::new();
        api.set_person_record(json!({"ldapkey": "key-x"}));
        let resolver = DirectoryResolver::new(api.clone(), TEST_TTL);

        let response = resolver.person_details("key-x").await;
        assert!(response.is_error());
        assert!(response.person.is_none());
        assert_eq!(response.ldapkey, "key-x");

        // Not cached: a fixed upstream record is picked up on retry.
        api.set_person_record(person("jx"));
        let response = resolver.person_details("key-x").await;
        assert!(!response.is_error());
        assert_eq!(api.details_calls.load(Ordering::SeqCst), 2);
    }
}
