use serde::{Deserialize, Serialize};

use super::Content;

/// Explicit rating a user gave a unified genre
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenreRatingValue {
    Love,
    NotForMe,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreRating {
    /// Unified genre id, e.g. "action"
    pub genre_id: String,
    pub rating: GenreRatingValue,
}

/// Answer to a title quiz question
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Like,
    Dislike,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleVote {
    pub content: Content,
    pub vote: Vote,
}

/// Everything a user has done that implies a genre preference
///
/// Supplied by the caller on every request; nothing here is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserSignals {
    #[serde(default)]
    pub liked: Vec<Content>,
    #[serde(default)]
    pub watchlist: Vec<Content>,
    #[serde(default)]
    pub collection: Vec<Content>,
    #[serde(default)]
    pub hidden: Vec<Content>,
    #[serde(default)]
    pub genre_ratings: Vec<GenreRating>,
    #[serde(default)]
    pub title_votes: Vec<TitleVote>,
}

impl UserSignals {
    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
            && self.watchlist.is_empty()
            && self.collection.is_empty()
            && self.hidden.is_empty()
            && self.genre_ratings.is_empty()
            && self.title_votes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_deserialize_partial_body() {
        let json = r#"{
            "genre_ratings": [{"genre_id": "horror", "rating": "not_for_me"}],
            "title_votes": [{"content": {"id": 1, "media_type": "tv"}, "vote": "dislike"}]
        }"#;

        let signals: UserSignals = serde_json::from_str(json).unwrap();
        assert!(signals.liked.is_empty());
        assert_eq!(signals.genre_ratings[0].rating, GenreRatingValue::NotForMe);
        assert_eq!(signals.title_votes[0].vote, Vote::Dislike);
        assert!(!signals.is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(UserSignals::default().is_empty());
    }
}
