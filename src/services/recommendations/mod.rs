//! Genre-based recommendation engine
//!
//! Scoring (`aggregator`, `profile`, `year_preferences`) is synchronous and
//! pure. Only discovery talks to the metadata provider.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    models::{
        Content, GenrePreference, GenreYearPreference, MediaType, RecommendationProfile,
        UserSignals,
    },
    services::{genre_catalog::GenreCatalog, providers::MediaProvider},
};

pub mod aggregator;
pub mod discovery;
pub mod merge;
pub mod profile;
pub mod weights;
pub mod year_preferences;

pub use discovery::DiscoveryPlanner;
pub use merge::merge_recommendations;
pub use weights::{SignalKind, SignalWeights};

/// Entry point tying the scoring pipeline to a metadata provider
#[derive(Clone)]
pub struct RecommendationService {
    catalog: GenreCatalog,
    weights: SignalWeights,
    provider: Arc<dyn MediaProvider>,
    planner: DiscoveryPlanner,
}

impl RecommendationService {
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        catalog: GenreCatalog,
        weights: SignalWeights,
    ) -> Self {
        Self {
            catalog,
            weights,
            planner: DiscoveryPlanner::new(Arc::clone(&provider), catalog),
            provider,
        }
    }

    pub fn catalog(&self) -> &GenreCatalog {
        &self.catalog
    }

    pub fn genre_preferences(&self, signals: &UserSignals) -> Vec<GenrePreference> {
        aggregator::calculate_genre_preferences(&self.catalog, &self.weights, signals)
    }

    pub fn build_profile(&self, user_id: &str, signals: &UserSignals) -> RecommendationProfile {
        profile::build_profile(&self.catalog, &self.weights, user_id, signals)
    }

    pub fn year_preferences(&self, collections: &[&[Content]]) -> Vec<GenreYearPreference> {
        year_preferences::detect_year_preferences(&self.catalog, collections)
    }

    pub async fn genre_based(
        &self,
        profile: &RecommendationProfile,
        limit: usize,
        exclude_ids: &HashSet<u64>,
        page: u32,
    ) -> Vec<Content> {
        self.planner
            .get_genre_based_recommendations(profile, limit, exclude_ids, page)
            .await
    }

    /// Top-rated movies in the profile's strongest genre
    ///
    /// Empty when the profile has no genres or the provider fails.
    pub async fn top_rated_in_top_genre(
        &self,
        profile: &RecommendationProfile,
        exclude_ids: &HashSet<u64>,
        page: u32,
    ) -> Vec<Content> {
        let Some(top) = profile.top_genres.first() else {
            return Vec::new();
        };

        match self
            .provider
            .top_rated_by_genre(top.genre_id, MediaType::Movie, page.max(1))
            .await
        {
            Ok(content_page) => content_page
                .results
                .into_iter()
                .filter(|c| !exclude_ids.contains(&c.id))
                .collect(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    genre_id = top.genre_id,
                    provider = self.provider.name(),
                    "Top rated fetch failed, skipping source"
                );
                Vec::new()
            }
        }
    }

    /// Profile plus a blended feed of genre discovery and top-rated picks
    pub async fn for_you(
        &self,
        user_id: &str,
        signals: &UserSignals,
        limit: usize,
        exclude_ids: &HashSet<u64>,
        page: u32,
    ) -> (RecommendationProfile, Vec<Content>) {
        let profile = self.build_profile(user_id, signals);

        let (discovered, top_rated) = tokio::join!(
            self.genre_based(&profile, limit, exclude_ids, page),
            self.top_rated_in_top_genre(&profile, exclude_ids, page),
        );

        let merged = merge_recommendations(&[discovered, top_rated], limit);

        tracing::info!(
            user_id = %user_id,
            top_genres = profile.top_genres.len(),
            returned = merged.len(),
            "For-you feed built"
        );

        (profile, merged)
    }
}
