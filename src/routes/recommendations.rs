use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    db::CacheKey,
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Content, GenrePreference, GenreYearPreference, RecommendationProfile, UserSignals},
    routes::AppState,
    services::recommendations::merge_recommendations,
};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_page() -> u32 {
    1
}

fn validate_paging(limit: usize, page: u32) -> AppResult<()> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    if page == 0 {
        return Err(AppError::InvalidInput("page must be at least 1".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub user_id: String,
    #[serde(default)]
    pub signals: UserSignals,
}

#[derive(Debug, Deserialize)]
pub struct YearPreferencesRequest {
    pub collections: Vec<Vec<Content>>,
}

#[derive(Debug, Deserialize)]
pub struct GenreRecommendationRequest {
    pub profile: RecommendationProfile,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub exclude_ids: HashSet<u64>,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct ForYouRequest {
    pub user_id: String,
    #[serde(default)]
    pub signals: UserSignals,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub exclude_ids: HashSet<u64>,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Serialize)]
pub struct ForYouResponse {
    pub profile: RecommendationProfile,
    pub results: Vec<Content>,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub sources: Vec<Vec<Content>>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Handler for scored genre preferences
pub async fn preferences(
    State(state): State<Arc<AppState>>,
    Json(signals): Json<UserSignals>,
) -> Json<Vec<GenrePreference>> {
    Json(state.recommendations.genre_preferences(&signals))
}

/// Handler that builds a profile and caches it for later lookups
pub async fn build_profile(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ProfileRequest>,
) -> AppResult<Json<RecommendationProfile>> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("user_id cannot be empty".to_string()));
    }

    let profile = state
        .recommendations
        .build_profile(&request.user_id, &request.signals);

    if let Some(cache) = &state.cache {
        cache.set_in_background(
            &CacheKey::Profile(profile.user_id.clone()),
            &profile,
            state.profile_cache_ttl,
        );
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %profile.user_id,
        top_genres = profile.top_genres.len(),
        "Profile built"
    );

    Ok(Json(profile))
}

/// Handler returning the last profile built for a user
///
/// A cache that is missing or failing reads as a miss.
pub async fn cached_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<RecommendationProfile>> {
    let not_found = || AppError::NotFound(format!("No cached profile for {}", user_id));

    let Some(cache) = state.cache.as_ref() else {
        return Err(not_found());
    };

    match cache
        .get_from_cache::<RecommendationProfile>(&CacheKey::Profile(user_id.clone()))
        .await
    {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(not_found()),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user_id, "Profile cache read failed");
            Err(not_found())
        }
    }
}

/// Handler for per-genre release-year preferences
pub async fn year_preferences(
    State(state): State<Arc<AppState>>,
    Json(request): Json<YearPreferencesRequest>,
) -> Json<Vec<GenreYearPreference>> {
    let collections: Vec<&[Content]> = request.collections.iter().map(Vec::as_slice).collect();
    Json(state.recommendations.year_preferences(&collections))
}

/// Handler for discovery driven by a caller-supplied profile
pub async fn genre_based(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<GenreRecommendationRequest>,
) -> AppResult<Json<Vec<Content>>> {
    validate_paging(request.limit, request.page)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %request.profile.user_id,
        limit = request.limit,
        page = request.page,
        "Processing genre recommendation request"
    );

    let results = state
        .recommendations
        .genre_based(
            &request.profile,
            request.limit,
            &request.exclude_ids,
            request.page,
        )
        .await;

    Ok(Json(results))
}

/// Handler for the blended feed built straight from signals
pub async fn for_you(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ForYouRequest>,
) -> AppResult<Json<ForYouResponse>> {
    validate_paging(request.limit, request.page)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        limit = request.limit,
        page = request.page,
        "Processing for-you request"
    );

    let (profile, results) = state
        .recommendations
        .for_you(
            &request.user_id,
            &request.signals,
            request.limit,
            &request.exclude_ids,
            request.page,
        )
        .await;

    Ok(Json(ForYouResponse { profile, results }))
}

/// Handler for merging lists from several recommendation sources
pub async fn merge(Json(request): Json<MergeRequest>) -> AppResult<Json<Vec<Content>>> {
    validate_paging(request.limit, 1)?;
    Ok(Json(merge_recommendations(&request.sources, request.limit)))
}
