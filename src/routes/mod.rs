use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Cache,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::RecommendationService,
};

pub mod genres;
pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub recommendations: RecommendationService,
    /// Profile cache; `None` runs without Redis
    pub cache: Option<Cache>,
    pub profile_cache_ttl: u64,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/genres", get(genres::list))
        .route(
            "/recommendations/preferences",
            post(recommendations::preferences),
        )
        .route("/recommendations/profile", post(recommendations::build_profile))
        .route(
            "/recommendations/profile/:user_id",
            get(recommendations::cached_profile),
        )
        .route(
            "/recommendations/year-preferences",
            post(recommendations::year_preferences),
        )
        .route("/recommendations/genre", post(recommendations::genre_based))
        .route("/recommendations/for-you", post(recommendations::for_you))
        .route("/recommendations/merge", post(recommendations::merge))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
