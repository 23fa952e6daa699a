use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured location attached to a calendar event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Contact information attached to a calendar event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One calendar occurrence as published by the upstream feed.
///
/// The feed schema is open: fields the projection does not know about are
/// preserved verbatim in `extra` instead of being rejected, so a record
/// round-trips through the cache without losing upstream data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque upstream identifier.
    pub id: String,
    /// Raw ISO-8601 start timestamp, kept as received.
    pub start_timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Sponsoring group, exposed as "groups" in the simplified view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_sponsors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<EventLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<EventContact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_url: Option<String>,
    /// Upstream fields the typed projection does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Compact event projection handed to analysis-oriented callers.
///
/// Carries the local id instead of the opaque upstream id; full records
/// are fetched afterwards through the local-id lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedEvent {
    pub local_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
}

/// Category and sponsor names active in a date range, each mapped to the
/// upstream ids of the events that carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilters {
    pub categories: BTreeMap<String, Vec<String>>,
    pub groups: BTreeMap<String, Vec<String>>,
}
