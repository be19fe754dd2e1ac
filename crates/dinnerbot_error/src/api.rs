//! API gateway error types.

use crate::CacheError;
use serde::{Deserialize, Serialize};

/// One element of the upstream's JSON:API `errors` list.
///
/// The remote API reports semantic failures as a list of these objects in an
/// otherwise well-formed response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Short summary of the problem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable explanation specific to this occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Kinds of gateway request failures.
#[derive(Debug, Clone, derive_more::Display)]
pub enum ApiErrorKind {
    /// The network call itself could not be completed
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// The remote API responded but reported structured errors
    #[display("API reported {} application error(s)", _0.len())]
    Application(Vec<ApiErrorDetail>),
    /// A cache contract violation surfaced while storing or reading an outcome
    #[display("Cache contract violation: {}", _0)]
    Cache(CacheError),
    /// A cached outcome could not be encoded or decoded
    #[display("Outcome encoding failed: {}", _0)]
    Json(String),
}

/// Gateway error with location tracking.
///
/// # Examples
///
/// ```
/// use dinnerbot_error::{ApiError, ApiErrorKind};
///
/// let err = ApiError::new(ApiErrorKind::Transport("Connection refused".to_string()));
/// assert!(format!("{}", err).contains("Connection refused"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("API Error: {} at line {} in {}", kind, line, file)]
pub struct ApiError {
    /// The kind of error that occurred
    pub kind: ApiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ApiError {
    /// Create a new gateway error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self::new(ApiErrorKind::Cache(err))
    }
}
