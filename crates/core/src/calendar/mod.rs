mod local_ids;
mod operations;
mod types;

pub use local_ids::LocalIdMap;
pub use operations::{parse_start_date, simplify, truncate_description, DESCRIPTION_LIMIT};
pub use types::{Event, EventContact, EventFilters, EventLocation, SimplifiedEvent};
