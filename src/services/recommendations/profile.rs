use chrono::Utc;

use crate::{
    models::{RecommendationProfile, UserSignals, YearRange},
    services::genre_catalog::GenreCatalog,
};

use super::{
    aggregator::calculate_genre_preferences, weights::SignalWeights,
    year_preferences::extract_year,
};

/// Number of genres kept on a profile
pub const TOP_GENRE_COUNT: usize = 5;

/// Builds a fresh profile from the user's current signals
///
/// Pure apart from the `updated_at` timestamp.
pub fn build_profile(
    catalog: &GenreCatalog,
    weights: &SignalWeights,
    user_id: &str,
    signals: &UserSignals,
) -> RecommendationProfile {
    let mut top_genres = calculate_genre_preferences(catalog, weights, signals);
    top_genres.truncate(TOP_GENRE_COUNT);

    RecommendationProfile {
        user_id: user_id.to_string(),
        top_genres,
        preferred_rating: preferred_rating(signals),
        preferred_year_range: preferred_year_range(signals),
        updated_at: Utc::now(),
    }
}

/// Mean vote average of liked items that have one
fn preferred_rating(signals: &UserSignals) -> Option<f64> {
    let ratings: Vec<f64> = signals
        .liked
        .iter()
        .filter_map(|c| c.vote_average)
        .filter(|r| r.is_finite())
        .collect();

    if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }
}

/// Year span of everything the user kept; hidden items are ignored
fn preferred_year_range(signals: &UserSignals) -> Option<YearRange> {
    let years = signals
        .liked
        .iter()
        .chain(&signals.watchlist)
        .chain(&signals.collection)
        .filter_map(extract_year);

    years.fold(None, |range, year| match range {
        None => Some(YearRange {
            min: year,
            max: year,
        }),
        Some(r) => Some(YearRange {
            min: r.min.min(year),
            max: r.max.max(year),
        }),
    })
}
