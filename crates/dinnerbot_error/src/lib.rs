//! Error types for the dinnerbot library.
//!
//! This crate provides the foundation error types used throughout the dinnerbot
//! ecosystem.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use dinnerbot_error::{DinnerbotResult, ConfigError, ConfigErrorKind};
//!
//! fn load_key() -> DinnerbotResult<String> {
//!     Err(ConfigError::new(ConfigErrorKind::MissingApiKey(
//!         "PUBG_API_KEY".to_string(),
//!     )))?
//! }
//!
//! match load_key() {
//!     Ok(key) => println!("Got: {}", key),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod cache;
mod config;
mod error;

pub use api::{ApiError, ApiErrorDetail, ApiErrorKind};
pub use cache::{CacheError, CacheErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{DinnerbotError, DinnerbotErrorKind, DinnerbotResult};
