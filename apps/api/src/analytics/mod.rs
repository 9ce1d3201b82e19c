//! Read-only aggregate reports over the record store.

pub mod buckets;
pub mod grouping;
pub mod handlers;
pub mod reports;
