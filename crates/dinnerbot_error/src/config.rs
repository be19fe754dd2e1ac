//! Configuration error types.

/// Kinds of gateway configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConfigErrorKind {
    /// The API credential was not found in the environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
}

/// Configuration error with location tracking.
///
/// # Examples
///
/// ```
/// use dinnerbot_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingApiKey("PUBG_API_KEY".to_string()));
/// assert!(format!("{}", err).contains("PUBG_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
