use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GenrePreference;

/// Inclusive range of release years
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

/// Snapshot of a user's taste used to drive discovery queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationProfile {
    pub user_id: String,
    /// At most five genres, highest score first
    pub top_genres: Vec<GenrePreference>,
    #[serde(default)]
    pub preferred_rating: Option<f64>,
    #[serde(default)]
    pub preferred_year_range: Option<YearRange>,
    pub updated_at: DateTime<Utc>,
}

/// How much data backs a per-genre year estimate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Tier for a number of observed items
    pub fn from_sample_size(sample_size: usize) -> Self {
        match sample_size {
            0..=3 => Confidence::Low,
            4..=7 => Confidence::Medium,
            _ => Confidence::High,
        }
    }

    /// Years added on either side of the preferred decades
    pub fn year_buffer(&self) -> Option<i32> {
        match self {
            Confidence::Low => None,
            Confidence::Medium => Some(5),
            Confidence::High => Some(2),
        }
    }
}

/// Release-year analysis for one unified genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreYearPreference {
    pub genre_id: String,
    pub genre_name: String,
    /// Decade start years, ascending
    pub preferred_decades: Vec<i32>,
    pub sample_size: usize,
    pub year_median: i32,
    pub year_min: i32,
    pub year_max: i32,
    pub confidence: Confidence,
    #[serde(default)]
    pub effective_year_range: Option<YearRange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_boundaries() {
        assert_eq!(Confidence::from_sample_size(1), Confidence::Low);
        assert_eq!(Confidence::from_sample_size(3), Confidence::Low);
        assert_eq!(Confidence::from_sample_size(4), Confidence::Medium);
        assert_eq!(Confidence::from_sample_size(7), Confidence::Medium);
        assert_eq!(Confidence::from_sample_size(8), Confidence::High);
        assert_eq!(Confidence::from_sample_size(250), Confidence::High);
    }

    #[test]
    fn test_confidence_serialization() {
        let json = serde_json::to_string(&Confidence::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
