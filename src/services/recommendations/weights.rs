use serde::{Deserialize, Serialize};

use crate::models::{GenreRatingValue, Vote};

/// Every kind of user action that feeds the genre score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    GenreLove,
    GenreNotForMe,
    Liked,
    Watchlist,
    Collection,
    Hidden,
    VoteLike,
    VoteDislike,
}

impl SignalKind {
    pub const ALL: [SignalKind; 8] = [
        SignalKind::GenreLove,
        SignalKind::GenreNotForMe,
        SignalKind::Liked,
        SignalKind::Watchlist,
        SignalKind::Collection,
        SignalKind::Hidden,
        SignalKind::VoteLike,
        SignalKind::VoteDislike,
    ];

    /// Whether a contribution of this kind increases the genre's sample count
    ///
    /// Negative signals move the score but not the count, and explicit
    /// genre ratings are not item observations.
    pub fn counts_toward_sample_size(&self) -> bool {
        matches!(
            self,
            SignalKind::Liked | SignalKind::Watchlist | SignalKind::Collection | SignalKind::VoteLike
        )
    }
}

impl From<GenreRatingValue> for SignalKind {
    fn from(rating: GenreRatingValue) -> Self {
        match rating {
            GenreRatingValue::Love => SignalKind::GenreLove,
            GenreRatingValue::NotForMe => SignalKind::GenreNotForMe,
        }
    }
}

impl From<Vote> for SignalKind {
    fn from(vote: Vote) -> Self {
        match vote {
            Vote::Like => SignalKind::VoteLike,
            Vote::Dislike => SignalKind::VoteDislike,
        }
    }
}

/// Signed weight applied per genre tag for each signal kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SignalWeights {
    pub genre_love: f64,
    pub genre_not_for_me: f64,
    pub liked: f64,
    pub watchlist: f64,
    pub collection: f64,
    pub hidden: f64,
    pub vote_like: f64,
    pub vote_dislike: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            genre_love: 5.0,
            genre_not_for_me: -5.0,
            liked: 3.0,
            watchlist: 1.0,
            collection: 1.0,
            hidden: -2.0,
            vote_like: 4.0,
            vote_dislike: -3.0,
        }
    }
}

impl SignalWeights {
    pub fn weight(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::GenreLove => self.genre_love,
            SignalKind::GenreNotForMe => self.genre_not_for_me,
            SignalKind::Liked => self.liked,
            SignalKind::Watchlist => self.watchlist,
            SignalKind::Collection => self.collection,
            SignalKind::Hidden => self.hidden,
            SignalKind::VoteLike => self.vote_like,
            SignalKind::VoteDislike => self.vote_dislike,
        }
    }
}
