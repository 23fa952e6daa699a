//! Time-bounded reference-data cache.
//!
//! Every reference cache in the system shares the same freshness policy:
//! an entry is served as long as its age is within the configured TTL,
//! otherwise it is refreshed in place before the read completes. Entries
//! are never evicted, so a cache grows with the number of distinct keys
//! ever seen. That is an accepted operational characteristic for
//! reference data, not a bug.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

/// A cached value with the instant it was last refreshed.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    refreshed_at: Instant,
}

/// Keyed store with refresh-on-staleness semantics.
///
/// Reads never return a value older than the TTL. A stale or missing
/// entry is refreshed synchronously via the fetch closure passed to
/// [`TtlCache::get_or_refresh`]; concurrent cache-miss callers for the
/// same key share a single fetch (per-key refresh guard), while distinct
/// keys never contend.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    /// Per-key refresh guards. Grows with distinct keys, like `entries`.
    refresh_locks: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns true if a value refreshed at `refreshed_at` is still fresh.
    pub fn is_fresh(&self, refreshed_at: Instant) -> bool {
        refreshed_at.elapsed() <= self.ttl
    }

    /// Returns the cached value for `key` if it is within the TTL.
    pub async fn get_fresh(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry.refreshed_at))
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key` with a fresh timestamp.
    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                value,
                refreshed_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently stored, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if no entry has ever been stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Returns the fresh cached value for `key`, refreshing it first when
    /// stale or absent.
    ///
    /// On a successful fetch the value is stored with a new timestamp and
    /// returned. On a failed fetch the error is propagated and any
    /// previous (stale) entry is left untouched, so the caller decides
    /// whether to surface the failure or fall back.
    pub async fn get_or_refresh<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get_fresh(&key).await {
            return Ok(value);
        }

        let key_lock = {
            let mut locks = self.refresh_locks.lock().await;
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = key_lock.lock().await;

        // A caller that held the guard before us may have refreshed already.
        if let Some(value) = self.get_fresh(&key).await {
            return Ok(value);
        }

        let value = fetch().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TEST_TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_insert_and_get_fresh() {
        let cache: TtlCache<String, u32> = TtlCache::new(TEST_TTL);

        cache.insert("a".to_string(), 1).await;
        assert_eq!(cache.get_fresh(&"a".to_string()).await, Some(1));
        assert_eq!(cache.get_fresh(&"b".to_string()).await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_served() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::ZERO);

        cache.insert("a".to_string(), 1).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(cache.get_fresh(&"a".to_string()).await, None);
        // The entry is still stored, just stale.
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_fresh_entry_skips_fetch() {
        let cache: TtlCache<String, u32> = TtlCache::new(TEST_TTL);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Result<u32, ()> = cache
                .get_or_refresh("a".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(value, Ok(7));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_one_fetch_per_read() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);

        for expected in 1..=3 {
            let value: Result<u32, ()> = cache
                .get_or_refresh("a".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(value, Ok(7));
            assert_eq!(calls.load(Ordering::SeqCst), expected);
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: TtlCache<String, u32> = TtlCache::new(TEST_TTL);

        let result: Result<u32, &str> = cache
            .get_or_refresh("a".to_string(), || async { Err("boom") })
            .await;
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty().await);

        // The next read retries and can succeed.
        let result: Result<u32, &str> = cache
            .get_or_refresh("a".to_string(), || async { Ok(9) })
            .await;
        assert_eq!(result, Ok(9));
    }

    #[tokio::test]
    async fn test_fresh_entry_shadows_failing_fetch() {
        let cache: TtlCache<String, u32> = TtlCache::new(TEST_TTL);
        cache.insert("a".to_string(), 1).await;

        let result: Result<u32, &str> = cache
            .get_or_refresh("a".to_string(), || async { Err("boom") })
            .await;
        assert_eq!(result, Ok(1));
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let cache: Arc<TtlCache<String, u32>> = Arc::new(TtlCache::new(TEST_TTL));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_refresh("a".to_string(), || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, ()>(7)
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(7));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_share_entries() {
        let cache: TtlCache<(String, u32), u32> = TtlCache::new(TEST_TTL);

        cache.insert(("duid".to_string(), 10), 1).await;
        assert_eq!(cache.get_fresh(&("duid".to_string(), 10)).await, Some(1));
        assert_eq!(cache.get_fresh(&("duid".to_string(), 25)).await, None);
    }
}
