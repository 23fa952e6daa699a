mod types;

pub use types::{DetailedPerson, DirectoryPerson, PersonDetailsResponse, SearchResponse};
