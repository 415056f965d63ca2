use serde::{Deserialize, Serialize};

use super::MediaType;

/// A genre in the app's own vocabulary
///
/// The metadata API uses different genre taxonomies for movies and TV; a
/// unified genre lists the ids valid for each.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct UnifiedGenre {
    pub id: &'static str,
    pub name: &'static str,
    pub movie_ids: &'static [u32],
    pub tv_ids: &'static [u32],
    pub child_safe: bool,
}

impl UnifiedGenre {
    /// External ids valid for the given media type
    pub fn ids_for(&self, media_type: MediaType) -> &'static [u32] {
        match media_type {
            MediaType::Movie => self.movie_ids,
            MediaType::Tv => self.tv_ids,
        }
    }

    /// A genre with no external ids can never be discovered
    pub fn is_reachable(&self) -> bool {
        !self.movie_ids.is_empty() || !self.tv_ids.is_empty()
    }
}

/// Aggregated preference for one external genre id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenrePreference {
    pub genre_id: u32,
    pub genre_name: String,
    /// Sum of signed signal weights
    pub score: f64,
    /// Number of positive contributions
    pub count: u32,
}
