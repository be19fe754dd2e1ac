//! Gateway over the PUBG developer API.

use crate::{GatewayConfig, Outcome};
use dinnerbot_cache::TtlCache;
use dinnerbot_error::{ApiError, ApiErrorDetail, ApiErrorKind};
use reqwest::{Client, Url};
use serde_json::Value as JsonValue;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, instrument};

const ACCEPT: &str = "application/vnd.api+json";

/// Gateway translating logical resource requests into cached, asynchronous
/// outcomes.
///
/// Each endpoint owns a dedicated [`TtlCache`]; the caches live and die with
/// the gateway and are never shared outside it. A cache hit short-circuits
/// the network call; on a miss the outcome is stored, success or failure
/// alike, before control returns to the caller. A transient upstream failure
/// is therefore sticky for the remainder of that endpoint's TTL. The gateway
/// never retries.
///
/// # Example
///
/// ```no_run
/// use dinnerbot_api::{GatewayConfig, StatsGateway};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gateway = StatsGateway::new(GatewayConfig::from_env()?);
///     let player = gateway.find_player_by_name("steam", "shroud").await?;
///     println!("{player}");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct StatsGateway {
    client: Client,
    config: GatewayConfig,
    players: Mutex<TtlCache>,
    player: Mutex<TtlCache>,
    status: Mutex<TtlCache>,
    seasons: Mutex<TtlCache>,
    player_season: Mutex<TtlCache>,
    matches: Mutex<TtlCache>,
}

impl StatsGateway {
    /// Create a gateway with one cache per endpoint, sized per the config's
    /// TTL table.
    pub fn new(config: GatewayConfig) -> Self {
        debug!(base_url = %config.base_url(), "Creating new StatsGateway");
        let ttl = config.ttl().clone();
        Self {
            client: Client::new(),
            players: Mutex::new(TtlCache::new(*ttl.players())),
            player: Mutex::new(TtlCache::new(*ttl.player())),
            status: Mutex::new(TtlCache::new(*ttl.status())),
            seasons: Mutex::new(TtlCache::new(*ttl.seasons())),
            player_season: Mutex::new(TtlCache::new(*ttl.player_season())),
            matches: Mutex::new(TtlCache::new(*ttl.matches())),
            config,
        }
    }

    /// Look up players on a shard by exact in-game name.
    #[instrument(skip(self))]
    pub async fn find_player_by_name(
        &self,
        region: &str,
        name: &str,
    ) -> Result<JsonValue, ApiError> {
        let url = self.resolve(
            &format!("/shards/{region}/players"),
            &[("filter[playerNames]", name)],
        )?;
        self.cached_get(&self.players, url).await
    }

    /// Look up a player on a shard by account id.
    #[instrument(skip(self))]
    pub async fn find_player_by_id(
        &self,
        region: &str,
        player_id: &str,
    ) -> Result<JsonValue, ApiError> {
        let url = self.resolve(&format!("/shards/{region}/players/{player_id}"), &[])?;
        self.cached_get(&self.player, url).await
    }

    /// Fetch the API status (the one endpoint not scoped to a shard).
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<JsonValue, ApiError> {
        let url = self.resolve("/status", &[])?;
        self.cached_get(&self.status, url).await
    }

    /// List the seasons available on a shard.
    #[instrument(skip(self))]
    pub async fn seasons(&self, region: &str) -> Result<JsonValue, ApiError> {
        let url = self.resolve(&format!("/shards/{region}/seasons"), &[])?;
        self.cached_get(&self.seasons, url).await
    }

    /// Fetch a player's stats for one season.
    #[instrument(skip(self))]
    pub async fn player_season_stats(
        &self,
        region: &str,
        player_id: &str,
        season_id: &str,
    ) -> Result<JsonValue, ApiError> {
        let url = self.resolve(
            &format!("/shards/{region}/players/{player_id}/seasons/{season_id}"),
            &[],
        )?;
        self.cached_get(&self.player_season, url).await
    }

    /// Fetch a match by id.
    #[instrument(skip(self))]
    pub async fn match_by_id(
        &self,
        region: &str,
        match_id: &str,
    ) -> Result<JsonValue, ApiError> {
        let url = self.resolve(&format!("/shards/{region}/matches/{match_id}"), &[])?;
        self.cached_get(&self.matches, url).await
    }

    /// Resolve a request path (plus query pairs) against the configured host.
    fn resolve(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(self.config.base_url())
            .and_then(|base| base.join(path))
            .map_err(|e| {
                ApiError::new(ApiErrorKind::Transport(format!("Invalid request URL: {e}")))
            })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Serve a GET through the endpoint's cache.
    ///
    /// The lock is held only across the retrieve and add steps; the network
    /// call is the sole suspension point. Two concurrent misses for one key
    /// therefore both reach the network, and the later completion's `add`
    /// surfaces `KeyOccupied` to its caller. This is a known, deliberate
    /// hazard of the no-dedup design.
    async fn cached_get(
        &self,
        cache: &Mutex<TtlCache>,
        url: Url,
    ) -> Result<JsonValue, ApiError> {
        let key = cache_key(&url);

        let cached = {
            // A poisoned lock still holds a consistent map; mutations are
            // single-step inserts.
            let cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.retrieve(&key)?.cloned()
        };
        if let Some(slot) = cached {
            debug!(%key, "Serving outcome from cache");
            return Outcome::from_cache_value(&slot)?.into_result();
        }

        let outcome = self.fetch(url).await;
        let slot = outcome.to_cache_value()?;
        {
            let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.add(&key, slot)?;
        }
        outcome.into_result()
    }

    /// Perform the network exchange and classify the outcome.
    #[instrument(skip(self, url), fields(path = url.path()))]
    async fn fetch(&self, url: Url) -> Outcome {
        debug!(url = %url, "Requesting resource from upstream");

        let response = match self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Accept", ACCEPT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = ?e, "Failed to reach upstream API");
                return Outcome::Transport {
                    message: format!("Request failed: {e}"),
                };
            }
        };

        // An unreadable or non-JSON body means the exchange never produced a
        // well-formed response, so it classifies as a transport failure.
        let body: JsonValue = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!(error = ?e, "Failed to read upstream response body");
                return Outcome::Transport {
                    message: format!("Malformed response: {e}"),
                };
            }
        };

        match body.get("errors").and_then(JsonValue::as_array) {
            Some(errors) if !errors.is_empty() => {
                debug!(count = errors.len(), "Upstream reported application errors");
                let errors = errors
                    .iter()
                    .map(|raw| {
                        serde_json::from_value(raw.clone()).unwrap_or_else(|_| ApiErrorDetail {
                            title: None,
                            detail: raw.as_str().map(str::to_string),
                        })
                    })
                    .collect();
                Outcome::Api { errors }
            }
            _ => {
                let payload = match body.get("data") {
                    Some(data) => data.clone(),
                    None => body,
                };
                Outcome::Data { payload }
            }
        }
    }
}

/// Derive the cache key from a fully-resolved URL: the path plus any query
/// string. Identical requests map to identical keys; distinct resources to
/// distinct keys.
fn cache_key(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
