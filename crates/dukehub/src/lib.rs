//! Cached, normalized views over three Duke web data sources (the
//! calendar events feed, the directory/LDAP lookup service, and the
//! scholars profile service), exposed as plain async operations for a
//! boundary layer to route requests to.
//!
//! Each component caches independently: the event store replaces a full
//! feed generation at a time (rebuilding its local-id mapping), while
//! the directory and scholar resolvers cache per lookup key with a
//! shared TTL policy. Caches are best-effort views over upstreams that
//! may themselves be inconsistent or intermittently unavailable.

pub mod calendar;
pub mod config;
pub mod directory;
pub mod scholars;
pub mod state;
pub mod upstream;

pub use config::Config;
pub use state::Services;
