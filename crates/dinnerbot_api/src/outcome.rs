//! Cached request outcomes.

use dinnerbot_error::{ApiError, ApiErrorDetail, ApiErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The result of one upstream exchange.
///
/// Successes and failures are stored uniformly in the same cache slot, so a
/// repeated call within the TTL window replays the original outcome without
/// touching the network, even when that outcome was a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Parsed `data` payload of a well-formed response
    Data {
        /// The response body's `data` member
        payload: JsonValue,
    },
    /// The network call could not be completed
    Transport {
        /// Description of the transport failure
        message: String,
    },
    /// The upstream answered, but with a non-empty `errors` list
    Api {
        /// The upstream's structured error objects
        errors: Vec<ApiErrorDetail>,
    },
}

impl Outcome {
    /// Convert into the caller-facing result; failures reject.
    pub fn into_result(self) -> Result<JsonValue, ApiError> {
        match self {
            Outcome::Data { payload } => Ok(payload),
            Outcome::Transport { message } => {
                Err(ApiError::new(ApiErrorKind::Transport(message)))
            }
            Outcome::Api { errors } => Err(ApiError::new(ApiErrorKind::Application(errors))),
        }
    }

    /// Encode for storage in a cache slot.
    pub fn to_cache_value(&self) -> Result<JsonValue, ApiError> {
        serde_json::to_value(self).map_err(|e| {
            ApiError::new(ApiErrorKind::Json(format!("Failed to encode outcome: {e}")))
        })
    }

    /// Decode a previously stored outcome.
    pub fn from_cache_value(value: &JsonValue) -> Result<Self, ApiError> {
        serde_json::from_value(value.clone()).map_err(|e| {
            ApiError::new(ApiErrorKind::Json(format!("Failed to decode outcome: {e}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_outcome_resolves() {
        let outcome = Outcome::Data {
            payload: json!({"kills": 3}),
        };
        assert_eq!(outcome.into_result().unwrap(), json!({"kills": 3}));
    }

    #[test]
    fn transport_outcome_rejects() {
        let outcome = Outcome::Transport {
            message: "Connection refused".to_string(),
        };
        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err.kind, ApiErrorKind::Transport(ref m) if m.contains("refused")));
    }

    #[test]
    fn api_outcome_rejects_with_details() {
        let outcome = Outcome::Api {
            errors: vec![ApiErrorDetail {
                title: Some("Not Found".to_string()),
                detail: Some("not found".to_string()),
            }],
        };
        let err = outcome.into_result().unwrap_err();
        match err.kind {
            ApiErrorKind::Application(errors) => {
                assert_eq!(errors[0].detail.as_deref(), Some("not found"));
            }
            other => panic!("expected application failure, got {other}"),
        }
    }

    #[test]
    fn outcomes_survive_the_cache_slot() {
        let outcomes = vec![
            Outcome::Data {
                payload: json!({"type": "player", "id": "abc"}),
            },
            Outcome::Transport {
                message: "dns failure".to_string(),
            },
            Outcome::Api {
                errors: vec![ApiErrorDetail {
                    title: None,
                    detail: Some("not found".to_string()),
                }],
            },
        ];
        for outcome in outcomes {
            let slot = outcome.to_cache_value().unwrap();
            assert!(!slot.is_null());
            assert_eq!(Outcome::from_cache_value(&slot).unwrap(), outcome);
        }
    }
}
