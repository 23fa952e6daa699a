//! Local integer ids standing in for opaque upstream event ids.
//!
//! Downstream callers batch event lookups by small integers rather than
//! the feed's long opaque strings. The mapping lives exactly as long as
//! one cache generation: it is rebuilt from empty at every refresh, so
//! local ids are NOT stable across refreshes. Callers holding an id
//! across a refresh boundary may find it reassigned or gone; that is the
//! contract, not a defect.

use std::collections::HashMap;

/// Bijection between local integer ids and upstream event ids.
///
/// Ids are assigned in first-seen order, starting at 1, strictly
/// increasing, with no reuse within a generation.
#[derive(Debug, Clone)]
pub struct LocalIdMap {
    by_upstream: HashMap<String, u32>,
    by_local: HashMap<u32, String>,
    next_id: u32,
}

impl LocalIdMap {
    pub fn new() -> Self {
        Self {
            by_upstream: HashMap::new(),
            by_local: HashMap::new(),
            next_id: 1,
        }
    }

    /// Returns the local id for `upstream_id`, assigning the next one if
    /// the upstream id has not been seen in this generation.
    pub fn assign(&mut self, upstream_id: &str) -> u32 {
        if let Some(&local_id) = self.by_upstream.get(upstream_id) {
            return local_id;
        }
        let local_id = self.next_id;
        self.next_id += 1;
        self.by_upstream.insert(upstream_id.to_string(), local_id);
        self.by_local.insert(local_id, upstream_id.to_string());
        local_id
    }

    /// Looks up the local id previously assigned to `upstream_id`.
    pub fn local_for(&self, upstream_id: &str) -> Option<u32> {
        self.by_upstream.get(upstream_id).copied()
    }

    /// Translates a local id back to its upstream id.
    pub fn upstream_for(&self, local_id: u32) -> Option<&str> {
        self.by_local.get(&local_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_local.is_empty()
    }
}

impl Default for LocalIdMap {
    fn default() -> Self {
        Self::new()
    }
}
