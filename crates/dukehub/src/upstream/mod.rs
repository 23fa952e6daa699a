//! reqwest-backed implementations of the upstream fetch traits.

mod directory;
mod events;
mod scholars;

pub use directory::DirectoryClient;
pub use events::EventsFeedClient;
pub use scholars::ScholarsClient;

use serde::de::DeserializeOwned;

use dukehub_core::upstream::{Result, UpstreamError};

/// Maps a non-success status to [`UpstreamError::Status`], otherwise
/// decodes the JSON body.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status(status.as_u16()));
    }
    response
        .json()
        .await
        .map_err(|err| UpstreamError::Decode(err.to_string()))
}

/// Maps a reqwest send failure to [`UpstreamError::Transport`].
pub(crate) fn transport_error(err: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport(err.to_string())
}
