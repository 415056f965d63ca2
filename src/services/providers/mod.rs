/// Media metadata provider abstraction
///
/// The recommendation engine only needs two read operations from the
/// metadata API: filtered discovery and top-rated-by-genre listings. Each
/// provider maps those onto its own endpoints.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{
    error::AppResult,
    models::{ContentPage, MediaType},
};

pub mod tmdb;

/// Deepest page the metadata API will serve
pub const MAX_API_PAGE: u32 = 500;

/// Result ordering for discovery queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortBy {
    #[serde(rename = "vote_average.desc")]
    RatingDesc,
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::RatingDesc => "vote_average.desc",
            SortBy::PopularityDesc => "popularity.desc",
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filters for one page of genre discovery
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    /// External genre ids; a result matches if it has any of them
    pub genre_ids: Vec<u32>,
    pub media_type: MediaType,
    pub min_rating: f64,
    pub min_vote_count: u32,
    pub page: u32,
    pub sort_by: SortBy,
}

impl DiscoverQuery {
    /// Stable key identifying this query, used for caching
    pub fn cache_key(&self) -> String {
        let genres: Vec<String> = self.genre_ids.iter().map(|g| g.to_string()).collect();
        format!(
            "{}:{}:{:.1}:{}:{}:{}",
            self.media_type,
            genres.join("|"),
            self.min_rating,
            self.min_vote_count,
            self.page,
            self.sort_by
        )
    }
}

/// Trait for media metadata providers
///
/// Implementations must be shareable across tasks: the discovery planner
/// fans requests out with `tokio::spawn` over an `Arc<dyn MediaProvider>`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaProvider: Send + Sync {
    /// Fetch one page of content matching the query
    async fn discover_by_genres(&self, query: &DiscoverQuery) -> AppResult<ContentPage>;

    /// Fetch one page of the highest-rated content in a genre
    async fn top_rated_by_genre(
        &self,
        genre_id: u32,
        media_type: MediaType,
        page: u32,
    ) -> AppResult<ContentPage>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
