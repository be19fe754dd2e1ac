//! Dinnerbot - cached PUBG stats core
//!
//! Dinnerbot's core fronts the rate-limited PUBG developer API with a
//! time-boxed result cache. Command handlers ask the [`StatsGateway`] for a
//! resource; the gateway answers from its per-endpoint caches when it can and
//! memoizes every outcome, including failures, when it cannot.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dinnerbot::{GatewayConfig, StatsGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = StatsGateway::new(GatewayConfig::from_env()?);
//!
//!     let players = gateway.find_player_by_name("steam", "shroud").await?;
//!     println!("{players}");
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `dinnerbot_error` - foundation error types
//! - `dinnerbot_cache` - the TTL result cache
//! - `dinnerbot_api` - the gateway over the remote API

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use dinnerbot_api::{
    CacheTtlConfig, CacheTtlConfigBuilder, GatewayConfig, GatewayConfigBuilder, Outcome,
    StatsGateway,
};
pub use dinnerbot_cache::{CacheEntry, TtlCache};
pub use dinnerbot_error::{
    ApiError, ApiErrorDetail, ApiErrorKind, CacheError, CacheErrorKind, ConfigError,
    ConfigErrorKind, DinnerbotError, DinnerbotErrorKind, DinnerbotResult,
};
