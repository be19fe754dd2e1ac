//! Gateway configuration.

use derive_getters::Getters;
use dinnerbot_error::{ConfigError, ConfigErrorKind};
use serde::{Deserialize, Serialize};

/// Per-endpoint cache lifetimes, in seconds.
///
/// Each endpoint's TTL reflects how often the underlying data changes: the
/// platform status is checked with a short window, season listings change
/// rarely so they keep a long one, and player and match data sit in between.
#[derive(
    Debug,
    Clone,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct CacheTtlConfig {
    /// TTL for player lookups by name (seconds)
    #[serde(default = "default_players_ttl")]
    #[builder(default = "default_players_ttl()")]
    players: u64,

    /// TTL for player lookups by id (seconds)
    #[serde(default = "default_player_ttl")]
    #[builder(default = "default_player_ttl()")]
    player: u64,

    /// TTL for the API status endpoint (seconds)
    #[serde(default = "default_status_ttl")]
    #[builder(default = "default_status_ttl()")]
    status: u64,

    /// TTL for season listings (seconds)
    #[serde(default = "default_seasons_ttl")]
    #[builder(default = "default_seasons_ttl()")]
    seasons: u64,

    /// TTL for per-player season stats (seconds)
    #[serde(default = "default_player_season_ttl")]
    #[builder(default = "default_player_season_ttl()")]
    player_season: u64,

    /// TTL for match lookups (seconds)
    #[serde(default = "default_matches_ttl")]
    #[builder(default = "default_matches_ttl()")]
    matches: u64,
}

fn default_players_ttl() -> u64 {
    600
}

fn default_player_ttl() -> u64 {
    600
}

fn default_status_ttl() -> u64 {
    60
}

fn default_seasons_ttl() -> u64 {
    86_400
}

fn default_player_season_ttl() -> u64 {
    600
}

fn default_matches_ttl() -> u64 {
    3_600
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            players: default_players_ttl(),
            player: default_player_ttl(),
            status: default_status_ttl(),
            seasons: default_seasons_ttl(),
            player_season: default_player_season_ttl(),
            matches: default_matches_ttl(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.pubg.com".to_string()
}

/// Construction settings for [`StatsGateway`].
///
/// # Example
///
/// ```
/// use dinnerbot_api::GatewayConfig;
///
/// let config = GatewayConfig::new("my-api-key");
/// assert_eq!(config.base_url(), "https://api.pubg.com");
/// ```
///
/// [`StatsGateway`]: crate::StatsGateway
#[derive(
    Debug,
    Clone,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct GatewayConfig {
    /// Bearer credential sent with every upstream request
    api_key: String,

    /// Upstream host; overridable for tests and proxies
    #[serde(default = "default_base_url")]
    #[builder(default = "default_base_url()")]
    base_url: String,

    /// Per-endpoint cache lifetimes
    #[serde(default)]
    #[builder(default)]
    ttl: CacheTtlConfig,
}

impl GatewayConfig {
    /// Create a config with the given API key and default everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            ttl: CacheTtlConfig::default(),
        }
    }

    /// Build a config from the environment, loading `.env` if present.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `PUBG_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("PUBG_API_KEY").map_err(|_| {
            ConfigError::new(ConfigErrorKind::MissingApiKey("PUBG_API_KEY".to_string()))
        })?;
        Ok(Self::new(api_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reflect_staleness_tolerance() {
        let ttl = CacheTtlConfig::default();
        assert!(ttl.status() < ttl.players());
        assert!(ttl.players() < ttl.matches());
        assert!(ttl.matches() < ttl.seasons());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{"api_key": "k"}"#).expect("minimal config");
        assert_eq!(config.api_key(), "k");
        assert_eq!(config.base_url(), "https://api.pubg.com");
        assert_eq!(*config.ttl().seasons(), 86_400);
    }

    #[test]
    fn from_env_requires_the_api_key() {
        // Test-local env mutation; no other test reads this variable.
        unsafe { std::env::remove_var("PUBG_API_KEY") };
        let err = GatewayConfig::from_env().expect_err("missing key is an error");
        assert!(matches!(
            err.kind,
            ConfigErrorKind::MissingApiKey(ref var) if var == "PUBG_API_KEY"
        ));
    }

    #[test]
    fn builder_overrides_base_url() {
        let config = GatewayConfigBuilder::default()
            .api_key("k".to_string())
            .base_url("http://127.0.0.1:9".to_string())
            .build()
            .expect("config builds");
        assert_eq!(config.base_url(), "http://127.0.0.1:9");
    }
}
