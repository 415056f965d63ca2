use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use reelscout_api::{
    db::{create_redis_client, Cache},
    error::{AppError, AppResult},
    models::{Content, ContentPage, MediaType},
    routes::{create_router, AppState},
    services::{
        providers::{DiscoverQuery, MediaProvider},
        recommendations::SignalWeights,
        GenreCatalog, RecommendationService,
    },
};

/// Provider returning ids derived from the query, or failing on demand
#[derive(Default)]
struct StubProvider {
    calls: AtomicUsize,
    fail_tv: bool,
}

#[async_trait::async_trait]
impl MediaProvider for StubProvider {
    async fn discover_by_genres(&self, query: &DiscoverQuery) -> AppResult<ContentPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_tv && query.media_type == MediaType::Tv {
            return Err(AppError::provider("stub", "tv is down"));
        }

        let base = match query.media_type {
            MediaType::Movie => 1000,
            MediaType::Tv => 2000,
        } + u64::from(query.page) * 100;

        Ok(ContentPage {
            page: query.page,
            results: (0..20)
                .map(|i| Content::new(base + i, query.media_type, query.genre_ids.clone()))
                .collect(),
            total_pages: 50,
        })
    }

    async fn top_rated_by_genre(
        &self,
        genre_id: u32,
        media_type: MediaType,
        _page: u32,
    ) -> AppResult<ContentPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ContentPage {
            page: 1,
            results: vec![Content::new(9000 + u64::from(genre_id), media_type, vec![genre_id])],
            total_pages: 1,
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn create_test_server_with(provider: Arc<StubProvider>) -> TestServer {
    let state = Arc::new(AppState {
        recommendations: RecommendationService::new(
            provider,
            GenreCatalog::standard(),
            SignalWeights::default(),
        ),
        cache: None,
        profile_cache_ttl: 60,
    });
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(Arc::new(StubProvider::default()))
}

fn action_fan_signals() -> Value {
    json!({
        "liked": [
            {"id": 1, "media_type": "movie", "genre_ids": [28], "vote_average": 7.0, "release_date": "1999-03-31"},
            {"id": 2, "media_type": "movie", "genre_ids": [28], "vote_average": 8.0, "release_date": "2008-07-18"}
        ],
        "hidden": [
            {"id": 3, "media_type": "movie", "genre_ids": [27]}
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "6f1c2a8e-3f4b-4c5d-9e6f-7a8b9c0d1e2f";
    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;
    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_list_genres_filters() {
    let server = create_test_server();

    let response = server.get("/api/v1/genres?media_type=tv&child_safe=true").await;
    response.assert_status_ok();
    let genres: Vec<Value> = response.json();
    assert!(!genres.is_empty());
    assert!(genres.iter().all(|g| g["child_safe"] == true));
    assert!(genres.iter().all(|g| !g["tv_ids"].as_array().unwrap().is_empty()));

    let all: Vec<Value> = server.get("/api/v1/genres").await.json();
    assert!(all.len() > genres.len());
}

#[tokio::test]
async fn test_preferences_scenario() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations/preferences")
        .json(&action_fan_signals())
        .await;
    response.assert_status_ok();

    let prefs: Vec<Value> = response.json();
    assert_eq!(prefs.len(), 1);
    assert_eq!(prefs[0]["genre_id"], 28);
    assert_eq!(prefs[0]["genre_name"], "Action");
    assert_eq!(prefs[0]["score"], 6.0);
    assert_eq!(prefs[0]["count"], 2);
}

#[tokio::test]
async fn test_build_profile() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations/profile")
        .json(&json!({ "user_id": "u1", "signals": action_fan_signals() }))
        .await;
    response.assert_status_ok();

    let profile: Value = response.json();
    assert_eq!(profile["user_id"], "u1");
    assert_eq!(profile["top_genres"].as_array().unwrap().len(), 1);
    assert_eq!(profile["preferred_rating"], 7.5);
    assert_eq!(profile["preferred_year_range"], json!({"min": 1999, "max": 2008}));
}

#[tokio::test]
async fn test_build_profile_rejects_blank_user() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations/profile")
        .json(&json!({ "user_id": "  " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cached_profile_without_cache_is_not_found() {
    let server = create_test_server();
    let response = server.get("/api/v1/recommendations/profile/u1").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cached_profile_with_unreachable_cache_is_not_found() {
    let client = create_redis_client("redis://127.0.0.1:1").unwrap();
    let (cache, _writer) = Cache::new(client);

    let state = Arc::new(AppState {
        recommendations: RecommendationService::new(
            Arc::new(StubProvider::default()),
            GenreCatalog::standard(),
            SignalWeights::default(),
        ),
        cache: Some(cache),
        profile_cache_ttl: 60,
    });
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.get("/api/v1/recommendations/profile/u1").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("u1"));
}

#[tokio::test]
async fn test_genre_recommendations_past_last_page_are_empty() {
    let provider = Arc::new(StubProvider::default());
    let server = create_test_server_with(Arc::clone(&provider));

    let response = server
        .post("/api/v1/recommendations/genre")
        .json(&json!({
            "profile": {
                "user_id": "u1",
                "top_genres": [{"genre_id": 18, "genre_name": "Drama", "score": 9.0, "count": 3}],
                "updated_at": "2026-01-01T00:00:00Z"
            },
            "limit": 100,
            "page": 4294967295u32
        }))
        .await;
    response.assert_status_ok();

    let results: Vec<Value> = response.json();
    assert!(results.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_year_preferences() {
    let server = create_test_server();

    let years = [1990, 1991, 1995, 2005, 2006, 2007];
    let items: Vec<Value> = years
        .iter()
        .enumerate()
        .map(|(i, y)| {
            json!({
                "id": i,
                "media_type": "movie",
                "genre_ids": [35],
                "release_date": format!("{}-01-01", y)
            })
        })
        .collect();

    let response = server
        .post("/api/v1/recommendations/year-preferences")
        .json(&json!({ "collections": [items, []] }))
        .await;
    response.assert_status_ok();

    let prefs: Vec<Value> = response.json();
    assert_eq!(prefs.len(), 1);
    assert_eq!(prefs[0]["genre_id"], "comedy");
    assert_eq!(prefs[0]["confidence"], "medium");
    assert_eq!(prefs[0]["preferred_decades"], json!([1990, 2000]));
    assert_eq!(prefs[0]["year_median"], 2000);
    assert_eq!(prefs[0]["effective_year_range"], json!({"min": 1985, "max": 2015}));
}

#[tokio::test]
async fn test_genre_recommendations_with_empty_profile_skip_provider() {
    let provider = Arc::new(StubProvider::default());
    let server = create_test_server_with(Arc::clone(&provider));

    let response = server
        .post("/api/v1/recommendations/genre")
        .json(&json!({
            "profile": {
                "user_id": "u1",
                "top_genres": [],
                "updated_at": "2026-01-01T00:00:00Z"
            }
        }))
        .await;
    response.assert_status_ok();

    let results: Vec<Value> = response.json();
    assert!(results.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_genre_recommendations_exclude_and_limit() {
    let provider = Arc::new(StubProvider::default());
    let server = create_test_server_with(Arc::clone(&provider));

    let response = server
        .post("/api/v1/recommendations/genre")
        .json(&json!({
            "profile": {
                "user_id": "u1",
                "top_genres": [{"genre_id": 18, "genre_name": "Drama", "score": 9.0, "count": 3}],
                "updated_at": "2026-01-01T00:00:00Z"
            },
            "limit": 25,
            "exclude_ids": [1100],
            "page": 1
        }))
        .await;
    response.assert_status_ok();

    let results: Vec<Value> = response.json();
    assert_eq!(results.len(), 25);
    assert!(results.iter().all(|c| c["id"] != 1100));
    // two api pages, movie and tv each
    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_genre_recommendations_partial_failure() {
    let provider = Arc::new(StubProvider {
        fail_tv: true,
        ..Default::default()
    });
    let server = create_test_server_with(provider);

    let response = server
        .post("/api/v1/recommendations/genre")
        .json(&json!({
            "profile": {
                "user_id": "u1",
                "top_genres": [{"genre_id": 18, "genre_name": "Drama", "score": 9.0, "count": 3}],
                "updated_at": "2026-01-01T00:00:00Z"
            },
            "limit": 40
        }))
        .await;
    response.assert_status_ok();

    let results: Vec<Value> = response.json();
    assert_eq!(results.len(), 40);
    assert!(results.iter().all(|c| c["media_type"] == "movie"));
}

#[tokio::test]
async fn test_genre_recommendations_validate_limit() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations/genre")
        .json(&json!({
            "profile": {
                "user_id": "u1",
                "top_genres": [],
                "updated_at": "2026-01-01T00:00:00Z"
            },
            "limit": 0
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_for_you_blends_sources() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations/for-you")
        .json(&json!({
            "user_id": "u1",
            "signals": action_fan_signals(),
            "limit": 4,
            "exclude_ids": [1, 2]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["profile"]["top_genres"][0]["genre_id"], 28);

    let ids: Vec<u64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    // discovery leads, top-rated action movie second
    assert_eq!(ids, vec![1100, 9028, 1101, 1102]);
}

#[tokio::test]
async fn test_merge_endpoint() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations/merge")
        .json(&json!({
            "sources": [
                [{"id": 1, "media_type": "movie"}, {"id": 2, "media_type": "movie"}],
                [{"id": 2, "media_type": "movie"}, {"id": 3, "media_type": "tv"}]
            ],
            "limit": 3
        }))
        .await;
    response.assert_status_ok();

    let merged: Vec<Value> = response.json();
    let ids: Vec<u64> = merged.iter().map(|c| c["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
