use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    models::{Content, GenrePreference, MediaType, RecommendationProfile},
    services::{
        genre_catalog::GenreCatalog,
        providers::{DiscoverQuery, MediaProvider, SortBy, MAX_API_PAGE},
    },
};

/// Results per page returned by the metadata API
pub const API_PAGE_SIZE: usize = 20;

/// Minimum rating when the profile has no rating preference
pub const DEFAULT_MIN_RATING: f64 = 6.0;

/// Vote-count floor applied to every discovery query
pub const MIN_VOTE_COUNT: u32 = 200;

const FIRST_PAGE_GENRES: usize = 3;
const LATER_PAGE_GENRES: usize = 5;
const GENRE_ROTATION_STEP: usize = 2;

/// Genres used for a logical page
///
/// Page 1 uses the strongest three. Later pages use up to five, starting two
/// slots further along each page and wrapping, so different genres lead.
pub fn genres_for_page(top_genres: &[GenrePreference], page: u32) -> Vec<u32> {
    if top_genres.is_empty() {
        return Vec::new();
    }

    let page = page.max(1) as usize;
    let wanted = if page == 1 {
        FIRST_PAGE_GENRES
    } else {
        LATER_PAGE_GENRES
    };
    let count = wanted.min(top_genres.len());
    let start = ((page - 1) * GENRE_ROTATION_STEP) % top_genres.len();

    (0..count)
        .map(|i| top_genres[(start + i) % top_genres.len()].genre_id)
        .collect()
}

/// External pages fetched for a logical page: enough to fill `limit`,
/// laid out back to back across logical pages
///
/// Pages past [`MAX_API_PAGE`] are dropped, so very deep logical pages plan
/// no requests at all.
pub fn api_pages_for(limit: usize, page: u32) -> Vec<u32> {
    let per_page = u32::try_from(limit.div_ceil(API_PAGE_SIZE))
        .unwrap_or(u32::MAX)
        .max(1);
    let first = (page.max(1) - 1).saturating_mul(per_page).saturating_add(1);
    if first > MAX_API_PAGE {
        return Vec::new();
    }

    let last = first.saturating_add(per_page - 1).min(MAX_API_PAGE);
    (first..=last).collect()
}

/// Odd pages favour rating, even pages popularity
pub fn sort_for_page(page: u32) -> SortBy {
    if page % 2 == 1 {
        SortBy::RatingDesc
    } else {
        SortBy::PopularityDesc
    }
}

/// Rating floor derived from the profile
pub fn min_rating_for(profile: &RecommendationProfile) -> f64 {
    profile
        .preferred_rating
        .map(|r| r - 1.0)
        .unwrap_or(DEFAULT_MIN_RATING)
}

/// Turns a profile into discovery queries and collects their results
#[derive(Clone)]
pub struct DiscoveryPlanner {
    provider: Arc<dyn MediaProvider>,
    catalog: GenreCatalog,
}

impl DiscoveryPlanner {
    pub fn new(provider: Arc<dyn MediaProvider>, catalog: GenreCatalog) -> Self {
        Self { provider, catalog }
    }

    /// Every query needed for one logical page, movie and TV per API page
    ///
    /// Media types for which none of the genres have an equivalent are
    /// skipped.
    pub fn plan_queries(
        &self,
        profile: &RecommendationProfile,
        limit: usize,
        page: u32,
    ) -> Vec<DiscoverQuery> {
        let genres = genres_for_page(&profile.top_genres, page);
        if genres.is_empty() {
            return Vec::new();
        }

        let sort_by = sort_for_page(page);
        let min_rating = min_rating_for(profile);
        let mut queries = Vec::new();

        for api_page in api_pages_for(limit, page) {
            for media_type in MediaType::ALL {
                let genre_ids = self.catalog.translate_ids(&genres, media_type);
                if genre_ids.is_empty() {
                    continue;
                }

                queries.push(DiscoverQuery {
                    genre_ids,
                    media_type,
                    min_rating,
                    min_vote_count: MIN_VOTE_COUNT,
                    page: api_page,
                    sort_by,
                });
            }
        }

        queries
    }

    /// Content matching the profile's top genres for a logical page
    ///
    /// Never fails: a query that errors is logged and contributes nothing,
    /// while its siblings' results are kept. Ids in `exclude_ids` are
    /// removed, duplicates dropped, and the list cut to `limit`.
    pub async fn get_genre_based_recommendations(
        &self,
        profile: &RecommendationProfile,
        limit: usize,
        exclude_ids: &HashSet<u64>,
        page: u32,
    ) -> Vec<Content> {
        if profile.top_genres.is_empty() || limit == 0 {
            return Vec::new();
        }

        let start = Instant::now();
        let queries = self.plan_queries(profile, limit, page);
        let query_count = queries.len();

        let mut tasks = Vec::with_capacity(query_count);
        for query in queries {
            let provider = Arc::clone(&self.provider);
            let task = tokio::spawn(async move {
                let result = provider.discover_by_genres(&query).await;
                (query, result)
            });
            tasks.push(task);
        }

        let mut results = Vec::new();
        let mut failures = 0usize;

        for task in tasks {
            match task.await {
                Ok((_, Ok(content_page))) => results.extend(content_page.results),
                Ok((query, Err(e))) => {
                    failures += 1;
                    tracing::warn!(
                        error = %e,
                        media_type = %query.media_type,
                        api_page = query.page,
                        provider = self.provider.name(),
                        "Discover request failed, skipping"
                    );
                }
                Err(e) => {
                    failures += 1;
                    tracing::error!(error = %e, "Discover task join error");
                }
            }
        }

        if failures > 0 && failures == query_count {
            tracing::error!(
                user_id = %profile.user_id,
                failures,
                "All discover requests failed, returning no recommendations"
            );
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let recommendations: Vec<Content> = results
            .into_iter()
            .filter(|c| !exclude_ids.contains(&c.id))
            .filter(|c| seen.insert(c.id))
            .take(limit)
            .collect();

        tracing::info!(
            user_id = %profile.user_id,
            page,
            queries = query_count,
            failures,
            returned = recommendations.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Genre-based recommendations built"
        );

        recommendations
    }
}
