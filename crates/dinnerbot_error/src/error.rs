//! Top-level error wrapper types.

use crate::{ApiError, CacheError, ConfigError};

/// This is the foundation error enum covering every failure the dinnerbot
/// core can produce.
///
/// # Examples
///
/// ```
/// use dinnerbot_error::{DinnerbotError, ConfigError, ConfigErrorKind};
///
/// let config_err = ConfigError::new(ConfigErrorKind::MissingApiKey(
///     "PUBG_API_KEY".to_string(),
/// ));
/// let err: DinnerbotError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DinnerbotErrorKind {
    /// Cache contract violation
    #[from(CacheError)]
    Cache(CacheError),
    /// Gateway request failure
    #[from(ApiError)]
    Api(ApiError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Dinnerbot error with kind discrimination.
///
/// # Examples
///
/// ```
/// use dinnerbot_error::{DinnerbotResult, ConfigError, ConfigErrorKind};
///
/// fn might_fail() -> DinnerbotResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::MissingApiKey(
///         "PUBG_API_KEY".to_string(),
///     )))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Dinnerbot Error: {}", _0)]
pub struct DinnerbotError(Box<DinnerbotErrorKind>);

impl DinnerbotError {
    /// Create a new error from a kind.
    pub fn new(kind: DinnerbotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DinnerbotErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to DinnerbotErrorKind
impl<T> From<T> for DinnerbotError
where
    T: Into<DinnerbotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for dinnerbot operations.
///
/// # Examples
///
/// ```
/// use dinnerbot_error::{DinnerbotResult, ConfigError, ConfigErrorKind};
///
/// fn load_key() -> DinnerbotResult<String> {
///     Err(ConfigError::new(ConfigErrorKind::MissingApiKey(
///         "PUBG_API_KEY".to_string(),
///     )))?
/// }
/// ```
pub type DinnerbotResult<T> = std::result::Result<T, DinnerbotError>;
