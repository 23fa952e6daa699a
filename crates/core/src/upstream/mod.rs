mod error;
mod traits;

pub use error::{Result, UpstreamError};
pub use traits::{DirectoryApi, EventsFeed, ScholarsApi};
