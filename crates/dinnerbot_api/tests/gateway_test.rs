//! Integration tests for the stats gateway against a loopback upstream.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
};
use dinnerbot_api::{GatewayConfigBuilder, StatsGateway};
use dinnerbot_error::{ApiErrorKind, CacheErrorKind};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

#[derive(Default)]
struct Upstream {
    hits: AtomicUsize,
}

impl Upstream {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve upstream");
    });
    format!("http://{addr}")
}

fn gateway_for(base_url: String) -> StatsGateway {
    let config = GatewayConfigBuilder::default()
        .api_key("test-key".to_string())
        .base_url(base_url)
        .build()
        .expect("gateway config");
    StatsGateway::new(config)
}

#[tokio::test]
async fn success_is_resolved_and_cached() {
    let upstream = Arc::new(Upstream::default());
    let router = Router::new()
        .route(
            "/shards/:region/players/:id",
            get(
                |State(upstream): State<Arc<Upstream>>,
                 Path((region, id)): Path<(String, String)>| async move {
                    upstream.hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"data": {"type": "player", "id": id, "shard": region}}))
                },
            ),
        )
        .with_state(upstream.clone());
    let gateway = gateway_for(spawn(router).await);

    let first = gateway
        .find_player_by_id("steam", "abc")
        .await
        .expect("first call resolves");
    assert_eq!(first["id"], "abc");

    let second = gateway
        .find_player_by_id("steam", "abc")
        .await
        .expect("second call resolves");
    assert_eq!(second, first);
    assert_eq!(upstream.hits(), 1, "repeat call must be served from cache");
}

#[tokio::test]
async fn requests_carry_auth_and_media_type_headers() {
    let router = Router::new().route(
        "/status",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            let accept = headers
                .get("accept")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if auth == "Bearer test-key" && accept == "application/vnd.api+json" {
                Json(json!({"data": {"type": "status"}}))
            } else {
                Json(json!({"errors": [{"detail": "bad headers"}]}))
            }
        }),
    );
    let gateway = gateway_for(spawn(router).await);

    let status = gateway.status().await.expect("status resolves");
    assert_eq!(status["type"], "status");
}

#[tokio::test]
async fn application_failure_rejects_and_sticks() {
    let upstream = Arc::new(Upstream::default());
    let router = Router::new()
        .route(
            "/shards/:region/players",
            get(
                |State(upstream): State<Arc<Upstream>>,
                 Query(params): Query<HashMap<String, String>>| async move {
                    upstream.hits.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(
                        params.get("filter[playerNames]").map(String::as_str),
                        Some("nobody")
                    );
                    Json(json!({"errors": [{"title": "Not Found", "detail": "not found"}]}))
                },
            ),
        )
        .with_state(upstream.clone());
    let gateway = gateway_for(spawn(router).await);

    let first = gateway
        .find_player_by_name("steam", "nobody")
        .await
        .expect_err("application errors reject");
    match &first.kind {
        ApiErrorKind::Application(errors) => {
            assert_eq!(errors[0].detail.as_deref(), Some("not found"));
        }
        other => panic!("expected application failure, got {other}"),
    }

    let second = gateway
        .find_player_by_name("steam", "nobody")
        .await
        .expect_err("cached failure rejects again");
    assert!(matches!(second.kind, ApiErrorKind::Application(_)));
    assert_eq!(
        upstream.hits(),
        1,
        "cached failure must not re-hit the network"
    );
}

#[tokio::test]
async fn transport_failure_rejects_and_sticks() {
    // An upstream that accepts and immediately slams every connection shut,
    // counting the attempts.
    let attempts = Arc::new(AtomicUsize::new(0));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind broken upstream");
    let addr = listener.local_addr().expect("local addr");
    let counter = attempts.clone();
    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let gateway = gateway_for(format!("http://{addr}"));

    let first = gateway
        .seasons("steam")
        .await
        .expect_err("broken upstream rejects");
    assert!(matches!(first.kind, ApiErrorKind::Transport(_)));
    let attempts_after_first = attempts.load(Ordering::SeqCst);
    assert!(attempts_after_first >= 1, "first call must hit the network");

    let second = gateway
        .seasons("steam")
        .await
        .expect_err("cached transport failure rejects again");
    assert!(matches!(second.kind, ApiErrorKind::Transport(_)));
    assert_eq!(
        attempts.load(Ordering::SeqCst),
        attempts_after_first,
        "cached failure must not reconnect"
    );
}

#[tokio::test]
async fn distinct_parameters_are_cached_separately() {
    let upstream = Arc::new(Upstream::default());
    let router = Router::new()
        .route(
            "/shards/:region/players",
            get(
                |State(upstream): State<Arc<Upstream>>,
                 Query(params): Query<HashMap<String, String>>| async move {
                    upstream.hits.fetch_add(1, Ordering::SeqCst);
                    let name = params
                        .get("filter[playerNames]")
                        .cloned()
                        .unwrap_or_default();
                    Json(json!({"data": [{"type": "player", "name": name}]}))
                },
            ),
        )
        .with_state(upstream.clone());
    let gateway = gateway_for(spawn(router).await);

    let a = gateway
        .find_player_by_name("steam", "shroud")
        .await
        .expect("first name resolves");
    assert_eq!(a[0]["name"], "shroud");

    let b = gateway
        .find_player_by_name("steam", "chocoTaco")
        .await
        .expect("second name resolves");
    assert_eq!(b[0]["name"], "chocoTaco");
    assert_eq!(upstream.hits(), 2, "different names are different resources");

    gateway
        .find_player_by_name("steam", "shroud")
        .await
        .expect("repeat of first name resolves");
    assert_eq!(upstream.hits(), 2, "repeat is a cache hit");
}

#[tokio::test]
async fn region_scoped_paths_have_the_shard_shape() {
    let router = Router::new()
        .route(
            "/shards/:region/players/:id/seasons/:season",
            get(
                |Path((region, id, season)): Path<(String, String, String)>| async move {
                    Json(json!({"data": {"shard": region, "player": id, "season": season}}))
                },
            ),
        )
        .route(
            "/shards/:region/matches/:id",
            get(|Path((region, id)): Path<(String, String)>| async move {
                Json(json!({"data": {"type": "match", "id": id, "shard": region}}))
            }),
        );
    let gateway = gateway_for(spawn(router).await);

    let stats = gateway
        .player_season_stats("steam", "abc", "division.bro.official.pc-2018-01")
        .await
        .expect("season stats resolve");
    assert_eq!(stats["season"], "division.bro.official.pc-2018-01");

    let found = gateway
        .match_by_id("steam", "m-1")
        .await
        .expect("match resolves");
    assert_eq!(found["id"], "m-1");
}

#[tokio::test]
async fn concurrent_misses_surface_key_occupied() {
    let upstream = Arc::new(Upstream::default());
    let router = Router::new()
        .route(
            "/status",
            get(|State(upstream): State<Arc<Upstream>>| async move {
                upstream.hits.fetch_add(1, Ordering::SeqCst);
                // Hold both callers past the cache-miss check.
                tokio::time::sleep(Duration::from_millis(200)).await;
                Json(json!({"data": {"type": "status"}}))
            }),
        )
        .with_state(upstream.clone());
    let gateway = gateway_for(spawn(router).await);

    let (a, b) = tokio::join!(gateway.status(), gateway.status());
    assert_eq!(upstream.hits(), 2, "both misses reach the network");

    let (ok, err) = match (a, b) {
        (Ok(ok), Err(err)) | (Err(err), Ok(ok)) => (ok, err),
        other => panic!("expected exactly one success and one rejection, got {other:?}"),
    };
    assert_eq!(ok["type"], "status");
    match err.kind {
        ApiErrorKind::Cache(cache_err) => {
            assert!(matches!(cache_err.kind, CacheErrorKind::KeyOccupied(_)));
        }
        other => panic!("expected cache contract violation, got {other}"),
    }
}
