use thiserror::Error;

use dukehub_core::upstream::UpstreamError;

/// Errors from event store operations.
///
/// A failed refresh never touches the previous cache generation; callers
/// keep serving the old data once the feed recovers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventStoreError {
    #[error("event feed request failed: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("event feed returned an unexpected payload shape")]
    MalformedFeed,
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
