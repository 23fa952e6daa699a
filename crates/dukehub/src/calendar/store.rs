//! Cached event store over the calendar feed.
//!
//! Holds one full feed snapshot (a "generation") at a time. A refresh
//! replaces the whole generation atomically and rebuilds the local-id
//! mapping from empty, so local ids are only meaningful within a single
//! generation. Reads go through [`EventStore::ensure_fresh`], which
//! refreshes synchronously when the generation has aged past the TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use dukehub_core::calendar::{
    parse_start_date, simplify, Event, EventFilters, LocalIdMap, SimplifiedEvent,
};
use dukehub_core::upstream::EventsFeed;

use super::error::{EventStoreError, Result};

/// One successfully refreshed feed snapshot.
#[derive(Debug)]
struct Generation {
    /// Events in first-seen feed order.
    events: Vec<Event>,
    /// Upstream id -> index into `events`.
    by_upstream: HashMap<String, usize>,
    local_ids: LocalIdMap,
    refreshed_at: Instant,
}

/// Cached view over the calendar events feed.
pub struct EventStore<F> {
    feed: F,
    ttl: Duration,
    lookahead_days: u32,
    generation: RwLock<Option<Generation>>,
    /// Serializes full-feed refreshes so concurrent stale readers share one.
    refresh_lock: Mutex<()>,
}

impl<F> EventStore<F>
where
    F: EventsFeed,
{
    /// Default generation TTL.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
    /// Default feed window when a read triggers the refresh.
    pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 90;

    /// Creates a store over `feed` with the default TTL and lookahead.
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            ttl: Self::DEFAULT_TTL,
            lookahead_days: Self::DEFAULT_LOOKAHEAD_DAYS,
            generation: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Overrides the generation TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Overrides the feed window used by [`EventStore::ensure_fresh`].
    pub fn with_lookahead_days(mut self, lookahead_days: u32) -> Self {
        self.lookahead_days = lookahead_days;
        self
    }

    /// Fetches the feed for `lookahead_days` ahead and replaces the
    /// current generation.
    ///
    /// Records without an upstream id are skipped entirely; records that
    /// fail to deserialize are warned about and skipped. On any feed
    /// failure the previous generation is retained untouched.
    pub async fn refresh(&self, lookahead_days: u32) -> Result<()> {
        tracing::info!(lookahead_days, "refreshing event cache from feed");
        let payload = self.feed.fetch(lookahead_days).await?;
        let records = match payload {
            Value::Array(records) => records,
            Value::Object(mut wrapper) => match wrapper.remove("events") {
                Some(Value::Array(records)) => records,
                _ => return Err(EventStoreError::MalformedFeed),
            },
            _ => return Err(EventStoreError::MalformedFeed),
        };

        let mut events = Vec::with_capacity(records.len());
        let mut by_upstream = HashMap::new();
        let mut local_ids = LocalIdMap::new();
        for record in records {
            let Some(id) = record.get("id").and_then(Value::as_str) else {
                continue;
            };
            if id.is_empty() {
                continue;
            }
            let id = id.to_string();
            match serde_json::from_value::<Event>(record) {
                Ok(event) => {
                    if by_upstream.contains_key(&event.id) {
                        continue;
                    }
                    local_ids.assign(&event.id);
                    by_upstream.insert(event.id.clone(), events.len());
                    events.push(event);
                }
                Err(err) => {
                    tracing::warn!(event_id = %id, error = %err, "skipping malformed event record");
                }
            }
        }

        tracing::info!(count = events.len(), "event cache refreshed");
        let mut generation = self.generation.write().await;
        *generation = Some(Generation {
            events,
            by_upstream,
            local_ids,
            refreshed_at: Instant::now(),
        });
        Ok(())
    }

    /// Refreshes the generation if it is absent or older than the TTL.
    ///
    /// Every public query calls this first. Concurrent stale readers are
    /// serialized on the refresh guard so only one of them hits the feed.
    pub async fn ensure_fresh(&self) -> Result<()> {
        if self.generation_is_fresh().await {
            return Ok(());
        }
        let _guard = self.refresh_lock.lock().await;
        if self.generation_is_fresh().await {
            return Ok(());
        }
        self.refresh(self.lookahead_days).await
    }

    async fn generation_is_fresh(&self) -> bool {
        self.generation
            .read()
            .await
            .as_ref()
            .is_some_and(|generation| generation.refreshed_at.elapsed() <= self.ttl)
    }

    /// Simplified projections of events whose start date falls within
    /// `[start, end]` inclusive.
    ///
    /// Events with unparseable start timestamps are warned about and
    /// skipped here (they remain reachable through id-based lookups).
    /// Output order is generation order, not start-time order.
    pub async fn simplified_events(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SimplifiedEvent>> {
        self.ensure_fresh().await?;
        let mut guard = self.generation.write().await;
        let Some(generation) = guard.as_mut() else {
            return Ok(Vec::new());
        };

        let Generation {
            events, local_ids, ..
        } = generation;

        let mut simplified = Vec::new();
        for event in events.iter() {
            let Some(event_start) = parse_start_date(&event.start_timestamp) else {
                tracing::warn!(
                    event_id = %event.id,
                    start_timestamp = %event.start_timestamp,
                    "skipping event with unparseable start timestamp"
                );
                continue;
            };
            if event_start < start || event_start > end {
                continue;
            }
            // Normally assigned at refresh time; covers events that got
            // into the generation some other way.
            let local_id = local_ids.assign(&event.id);
            simplified.push(simplify(event, local_id));
        }
        Ok(simplified)
    }

    /// Full event records for a batch of local ids.
    ///
    /// Ids with no mapping in the current generation are silently
    /// skipped. Input order is preserved and duplicate ids pass through
    /// as duplicate events.
    pub async fn events_by_local_ids(&self, local_ids: &[u32]) -> Result<Vec<Event>> {
        self.ensure_fresh().await?;
        let guard = self.generation.read().await;
        let Some(generation) = guard.as_ref() else {
            return Ok(Vec::new());
        };

        let events = local_ids
            .iter()
            .filter_map(|&local_id| {
                let upstream_id = generation.local_ids.upstream_for(local_id)?;
                let index = generation.by_upstream.get(upstream_id)?;
                generation.events.get(*index).cloned()
            })
            .collect();
        Ok(events)
    }

    /// Full event records for a batch of upstream ids, silently skipping
    /// ids not present in the current generation.
    pub async fn events_by_ids(&self, ids: &[String]) -> Result<Vec<Event>> {
        self.ensure_fresh().await?;
        let guard = self.generation.read().await;
        let Some(generation) = guard.as_ref() else {
            return Ok(Vec::new());
        };

        let events = ids
            .iter()
            .filter_map(|id| {
                let index = generation.by_upstream.get(id)?;
                generation.events.get(*index).cloned()
            })
            .collect();
        Ok(events)
    }

    /// Category and sponsor names active within `[start, end]`, each with
    /// the upstream ids of the events carrying them.
    pub async fn filters_with_ids(&self, start: NaiveDate, end: NaiveDate) -> Result<EventFilters> {
        self.ensure_fresh().await?;
        let guard = self.generation.read().await;
        let Some(generation) = guard.as_ref() else {
            return Ok(EventFilters::default());
        };

        let mut filters = EventFilters::default();
        for event in &generation.events {
            let Some(event_start) = parse_start_date(&event.start_timestamp) else {
                tracing::warn!(
                    event_id = %event.id,
                    start_timestamp = %event.start_timestamp,
                    "skipping event with unparseable start timestamp"
                );
                continue;
            };
            if event_start < start || event_start > end {
                continue;
            }
            if let Some(categories) = &event.categories {
                for category in categories {
                    filters
                        .categories
                        .entry(category.clone())
                        .or_default()
                        .push(event.id.clone());
                }
            }
            if let Some(sponsor) = &event.sponsor {
                if !sponsor.is_empty() {
                    filters
                        .groups
                        .entry(sponsor.clone())
                        .or_default()
                        .push(event.id.clone());
                }
            }
        }
        Ok(filters)
    }
}
