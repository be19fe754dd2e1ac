//! PUBG API gateway with time-boxed result caching.
//!
//! This crate fronts the rate-limited PUBG developer API. Every endpoint owns
//! a dedicated TTL cache; both successful payloads and failures are memoized
//! so repeated callers within the TTL window observe the same outcome without
//! re-hitting the network.

#![warn(missing_docs)]

mod config;
mod gateway;
mod outcome;

pub use config::{CacheTtlConfig, CacheTtlConfigBuilder, GatewayConfig, GatewayConfigBuilder};
pub use gateway::StatsGateway;
pub use outcome::Outcome;
