//! Cache error types.

/// Kinds of cache contract violations.
///
/// All three are programming errors in the caller, not normal cache-miss
/// conditions: a miss is reported as an absent value, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CacheErrorKind {
    /// Key was empty or missing
    #[display("Cache key must be a non-empty string")]
    InvalidKey,
    /// Value was null; absences must be stored as explicit failure values
    #[display("Cache value must not be null")]
    InvalidValue,
    /// Insertion attempted over an entry that is still valid
    #[display("Key already holds a live entry: {}", _0)]
    KeyOccupied(String),
}

/// Cache error with location tracking.
///
/// # Examples
///
/// ```
/// use dinnerbot_error::{CacheError, CacheErrorKind};
///
/// let err = CacheError::new(CacheErrorKind::KeyOccupied("/status".to_string()));
/// assert!(format!("{}", err).contains("/status"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cache Error: {} at line {} in {}", kind, line, file)]
pub struct CacheError {
    /// The kind of error that occurred
    pub kind: CacheErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CacheError {
    /// Create a new cache error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CacheErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
