//! Time-boxed result caching.
//!
//! This crate provides the keyed TTL store the API gateway uses to memoize
//! remote outcomes, reducing calls to a rate-limited upstream.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheEntry, TtlCache};
