mod extract;
mod types;

pub use extract::{grant_from_item, publication_from_item, scholar_from_item};
pub use types::{
    Education, Grant, GrantsResponse, Publication, PublicationsResponse, ScholarDetails,
    ScholarDetailsResponse,
};
