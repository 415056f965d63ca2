//! Mapping between the unified genre vocabulary and TMDB genre ids
//!
//! TMDB movie and TV taxonomies disagree (movies have "Action" = 28, TV has
//! "Action & Adventure" = 10759), so several unified genres can share one
//! external id. Reverse lookups resolve to the first entry in catalog order.

use std::collections::HashSet;

use crate::models::{MediaType, UnifiedGenre};

/// Default catalog, in lookup-priority order
pub const STANDARD_GENRES: &[UnifiedGenre] = &[
    UnifiedGenre {
        id: "action",
        name: "Action",
        movie_ids: &[28],
        tv_ids: &[10759],
        child_safe: false,
    },
    UnifiedGenre {
        id: "adventure",
        name: "Adventure",
        movie_ids: &[12],
        tv_ids: &[10759],
        child_safe: true,
    },
    UnifiedGenre {
        id: "animation",
        name: "Animation",
        movie_ids: &[16],
        tv_ids: &[16],
        child_safe: true,
    },
    UnifiedGenre {
        id: "comedy",
        name: "Comedy",
        movie_ids: &[35],
        tv_ids: &[35],
        child_safe: true,
    },
    UnifiedGenre {
        id: "crime",
        name: "Crime",
        movie_ids: &[80],
        tv_ids: &[80],
        child_safe: false,
    },
    UnifiedGenre {
        id: "documentary",
        name: "Documentary",
        movie_ids: &[99],
        tv_ids: &[99],
        child_safe: true,
    },
    UnifiedGenre {
        id: "drama",
        name: "Drama",
        movie_ids: &[18],
        tv_ids: &[18],
        child_safe: true,
    },
    UnifiedGenre {
        id: "family",
        name: "Family",
        movie_ids: &[10751],
        tv_ids: &[10751],
        child_safe: true,
    },
    UnifiedGenre {
        id: "kids",
        name: "Kids",
        movie_ids: &[],
        tv_ids: &[10762],
        child_safe: true,
    },
    UnifiedGenre {
        id: "fantasy",
        name: "Fantasy",
        movie_ids: &[14],
        tv_ids: &[10765],
        child_safe: true,
    },
    UnifiedGenre {
        id: "science_fiction",
        name: "Science Fiction",
        movie_ids: &[878],
        tv_ids: &[10765],
        child_safe: true,
    },
    UnifiedGenre {
        id: "history",
        name: "History",
        movie_ids: &[36],
        tv_ids: &[],
        child_safe: true,
    },
    UnifiedGenre {
        id: "horror",
        name: "Horror",
        movie_ids: &[27],
        tv_ids: &[9648],
        child_safe: false,
    },
    UnifiedGenre {
        id: "mystery",
        name: "Mystery",
        movie_ids: &[9648],
        tv_ids: &[9648],
        child_safe: false,
    },
    UnifiedGenre {
        id: "thriller",
        name: "Thriller",
        movie_ids: &[53],
        tv_ids: &[80, 9648],
        child_safe: false,
    },
    UnifiedGenre {
        id: "music",
        name: "Music",
        movie_ids: &[10402],
        tv_ids: &[],
        child_safe: true,
    },
    UnifiedGenre {
        id: "romance",
        name: "Romance",
        movie_ids: &[10749],
        tv_ids: &[],
        child_safe: true,
    },
    UnifiedGenre {
        id: "war",
        name: "War & Politics",
        movie_ids: &[10752],
        tv_ids: &[10768],
        child_safe: false,
    },
    UnifiedGenre {
        id: "western",
        name: "Western",
        movie_ids: &[37],
        tv_ids: &[37],
        child_safe: true,
    },
    UnifiedGenre {
        id: "reality",
        name: "Reality",
        movie_ids: &[],
        tv_ids: &[10764],
        child_safe: true,
    },
];

/// Immutable genre lookup table
///
/// Cheap to copy; pass it wherever genre resolution is needed instead of
/// reaching for a global.
#[derive(Debug, Clone, Copy)]
pub struct GenreCatalog {
    genres: &'static [UnifiedGenre],
}

impl Default for GenreCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl GenreCatalog {
    pub fn new(genres: &'static [UnifiedGenre]) -> Self {
        Self { genres }
    }

    /// Catalog backed by [`STANDARD_GENRES`]
    pub fn standard() -> Self {
        Self::new(STANDARD_GENRES)
    }

    pub fn all(&self) -> &'static [UnifiedGenre] {
        self.genres
    }

    /// Genres that can be discovered for a media type
    pub fn genres_for_media_type(
        &self,
        media_type: MediaType,
        child_safe_only: bool,
    ) -> Vec<&'static UnifiedGenre> {
        self.genres
            .iter()
            .filter(|g| !g.ids_for(media_type).is_empty())
            .filter(|g| !child_safe_only || g.child_safe)
            .collect()
    }

    pub fn find_genre(&self, id: &str) -> Option<&'static UnifiedGenre> {
        self.genres.iter().find(|g| g.id == id)
    }

    /// First catalog entry whose ids for `media_type` contain `external_id`
    pub fn genre_from_external_id(
        &self,
        external_id: u32,
        media_type: MediaType,
    ) -> Option<&'static UnifiedGenre> {
        self.genres
            .iter()
            .find(|g| g.ids_for(media_type).contains(&external_id))
    }

    /// Every catalog entry that claims `external_id`, in catalog order
    pub fn genres_from_external_id(
        &self,
        external_id: u32,
        media_type: MediaType,
    ) -> Vec<&'static UnifiedGenre> {
        self.genres
            .iter()
            .filter(|g| g.ids_for(media_type).contains(&external_id))
            .collect()
    }

    /// All movie ids followed by all TV ids of a unified genre
    ///
    /// Not deduplicated: a genre using the same id for both media types
    /// yields that id twice.
    pub fn external_ids(&self, unified_id: &str) -> Vec<u32> {
        self.find_genre(unified_id)
            .map(|g| g.movie_ids.iter().chain(g.tv_ids).copied().collect())
            .unwrap_or_default()
    }

    /// Display name for an external id, trying movie ids before TV ids
    pub fn genre_name(&self, external_id: u32) -> Option<&'static str> {
        self.genre_from_external_id(external_id, MediaType::Movie)
            .or_else(|| self.genre_from_external_id(external_id, MediaType::Tv))
            .map(|g| g.name)
    }

    /// Rewrites external ids so they are valid for `media_type`
    ///
    /// Ids already valid for the target type are kept as they are; others are
    /// resolved to their unified genre through the other media type and
    /// replaced by that genre's ids for the target. Order is preserved and
    /// duplicates are dropped.
    pub fn translate_ids(&self, ids: &[u32], media_type: MediaType) -> Vec<u32> {
        let other = match media_type {
            MediaType::Movie => MediaType::Tv,
            MediaType::Tv => MediaType::Movie,
        };

        let mut seen = HashSet::new();
        let mut translated = Vec::new();

        for &id in ids {
            let valid_as_is = self
                .genres
                .iter()
                .any(|g| g.ids_for(media_type).contains(&id));

            let candidates: &[u32] = if valid_as_is {
                std::slice::from_ref(&id)
            } else {
                self.genre_from_external_id(id, other)
                    .map(|g| g.ids_for(media_type))
                    .unwrap_or(&[])
            };

            for &candidate in candidates {
                if seen.insert(candidate) {
                    translated.push(candidate);
                }
            }
        }

        translated
    }

    /// Problems that would make the catalog misbehave, empty when sound
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut ids = HashSet::new();

        for genre in self.genres {
            if !ids.insert(genre.id) {
                problems.push(format!("duplicate genre id '{}'", genre.id));
            }
            if !genre.is_reachable() {
                problems.push(format!("genre '{}' has no external ids", genre.id));
            }
        }

        problems
    }
}
