use thiserror::Error;

use dukehub_core::upstream::UpstreamError;

/// Errors from scholar lookups, folded into error-tagged responses at the
/// resolver boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScholarError {
    #[error("scholars query failed: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("No details found for this person")]
    NoDetails,
}
