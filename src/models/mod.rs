use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod genre;
mod profile;
mod signals;

pub use genre::{GenrePreference, UnifiedGenre};
pub use profile::{Confidence, GenreYearPreference, RecommendationProfile, YearRange};
pub use signals::{GenreRating, GenreRatingValue, TitleVote, UserSignals, Vote};

/// Media type as understood by the metadata API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::Tv];

    /// Path segment used by the metadata API
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A movie or TV show as returned by the metadata API
///
/// Scoring treats this as read-only input; every field other than `id` and
/// `media_type` may be missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub id: u64,
    pub media_type: MediaType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Content {
    /// Bare item with only identity and genre tags
    pub fn new(id: u64, media_type: MediaType, genre_ids: Vec<u32>) -> Self {
        Self {
            id,
            media_type,
            title: None,
            name: None,
            genre_ids,
            vote_average: None,
            popularity: None,
            release_date: None,
            first_air_date: None,
            overview: None,
            poster_path: None,
        }
    }

    /// Release date for movies, first air date for TV
    pub fn date(&self) -> Option<&str> {
        match self.media_type {
            MediaType::Movie => self.release_date.as_deref(),
            MediaType::Tv => self.first_air_date.as_deref(),
        }
    }

    /// Display title regardless of media type
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }
}

/// One page of content from the metadata API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContentPage {
    pub page: u32,
    pub results: Vec<Content>,
    pub total_pages: u32,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw result entry from TMDB `/discover/{movie,tv}`
///
/// Discover results do not carry a media type, so it is attached on
/// conversion from the request that produced them.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbResult {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbResult {
    pub fn into_content(self, media_type: MediaType) -> Content {
        // TMDB sends "" for unknown dates
        let non_empty = |s: Option<String>| s.filter(|d| !d.trim().is_empty());

        Content {
            id: self.id,
            media_type,
            title: self.title,
            name: self.name,
            genre_ids: self.genre_ids,
            vote_average: self.vote_average,
            popularity: self.popularity,
            release_date: non_empty(self.release_date),
            first_air_date: non_empty(self.first_air_date),
            overview: self.overview,
            poster_path: self.poster_path,
        }
    }
}

/// Raw paginated response from TMDB `/discover/{movie,tv}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPagedResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbResult>,
    #[serde(default)]
    pub total_pages: u32,
}

impl TmdbPagedResponse {
    pub fn into_page(self, media_type: MediaType) -> ContentPage {
        ContentPage {
            page: self.page,
            results: self
                .results
                .into_iter()
                .map(|r| r.into_content(media_type))
                .collect(),
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_serde() {
        assert_eq!(serde_json::to_string(&MediaType::Tv).unwrap(), "\"tv\"");
        let parsed: MediaType = serde_json::from_str("\"movie\"").unwrap();
        assert_eq!(parsed, MediaType::Movie);
    }

    #[test]
    fn test_content_date_follows_media_type() {
        let mut movie = Content::new(1, MediaType::Movie, vec![28]);
        movie.release_date = Some("1999-03-31".to_string());
        movie.first_air_date = Some("2005-01-01".to_string());
        assert_eq!(movie.date(), Some("1999-03-31"));

        let mut show = Content::new(2, MediaType::Tv, vec![18]);
        show.release_date = Some("1999-03-31".to_string());
        assert_eq!(show.date(), None);
        show.first_air_date = Some("2008-01-20".to_string());
        assert_eq!(show.date(), Some("2008-01-20"));
    }

    #[test]
    fn test_content_deserializes_with_missing_fields() {
        let json = r#"{"id": 603, "media_type": "movie"}"#;
        let content: Content = serde_json::from_str(json).unwrap();
        assert_eq!(content.id, 603);
        assert!(content.genre_ids.is_empty());
        assert_eq!(content.vote_average, None);
    }

    #[test]
    fn test_tmdb_response_to_page() {
        let json = r#"{
            "page": 2,
            "total_pages": 40,
            "results": [
                {
                    "id": 1396,
                    "name": "Breaking Bad",
                    "genre_ids": [18, 80],
                    "vote_average": 8.9,
                    "popularity": 400.5,
                    "first_air_date": "2008-01-20"
                },
                {
                    "id": 1399,
                    "name": "Game of Thrones",
                    "genre_ids": [10765],
                    "first_air_date": ""
                }
            ]
        }"#;

        let response: TmdbPagedResponse = serde_json::from_str(json).unwrap();
        let page = response.into_page(MediaType::Tv);

        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 40);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].media_type, MediaType::Tv);
        assert_eq!(page.results[0].display_title(), Some("Breaking Bad"));
        assert_eq!(page.results[0].date(), Some("2008-01-20"));
        assert_eq!(page.results[1].first_air_date, None);
    }
}
