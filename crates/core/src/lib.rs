//! Core types and caching primitives for the dukehub reference-data
//! services: the TTL cache, the calendar event model with its local-id
//! mapping, directory and scholars projections, and the trait seams the
//! upstream fetch collaborators implement.

pub mod cache;
pub mod calendar;
pub mod directory;
pub mod scholars;
pub mod upstream;
