use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    models::{MediaType, UnifiedGenre},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    /// Restrict to genres discoverable for this media type
    media_type: Option<MediaType>,
    #[serde(default)]
    child_safe: bool,
}

/// Handler for the genre catalog listing
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenreQuery>,
) -> Json<Vec<UnifiedGenre>> {
    let catalog = state.recommendations.catalog();

    let genres: Vec<UnifiedGenre> = match params.media_type {
        Some(media_type) => catalog
            .genres_for_media_type(media_type, params.child_safe)
            .into_iter()
            .copied()
            .collect(),
        None => catalog
            .all()
            .iter()
            .filter(|g| !params.child_safe || g.child_safe)
            .copied()
            .collect(),
    };

    Json(genres)
}
