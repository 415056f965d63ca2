/// TMDB (The Movie Database) v3 provider
///
/// Both operations are served by `/discover/{movie,tv}`:
/// 1. Genre discovery: `with_genres` (ids joined with `|`, i.e. any-of),
///    rating and vote-count floors, caller-chosen sort order.
/// 2. Top rated by genre: same endpoint sorted by `vote_average.desc` with a
///    vote-count floor so obscure titles with a handful of 10/10 votes do not
///    win.
///
/// Genre ids are rewritten for the requested media type through the genre
/// catalog, since TMDB movie and TV taxonomies differ.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ContentPage, MediaType, TmdbPagedResponse},
    services::{
        genre_catalog::GenreCatalog,
        providers::{DiscoverQuery, MediaProvider, SortBy, MAX_API_PAGE},
    },
};
use reqwest::Client as HttpClient;

const DISCOVER_CACHE_TTL: u64 = 3600; // 1 hour
const TOP_RATED_CACHE_TTL: u64 = 21600; // 6 hours

/// Vote-count floor for top-rated listings
const TOP_RATED_MIN_VOTES: u32 = 200;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    catalog: GenreCatalog,
}

impl TmdbProvider {
    pub fn new(cache: Cache, catalog: GenreCatalog, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            catalog,
        }
    }

    /// Query-string parameters for a discover request, without the API key
    fn discover_params(&self, query: &DiscoverQuery, genre_ids: &[u32]) -> Vec<(&'static str, String)> {
        let genres: Vec<String> = genre_ids.iter().map(|g| g.to_string()).collect();

        vec![
            ("with_genres", genres.join("|")),
            ("vote_average.gte", format!("{:.1}", query.min_rating)),
            ("vote_count.gte", query.min_vote_count.to_string()),
            ("sort_by", query.sort_by.as_str().to_string()),
            ("page", query.page.max(1).to_string()),
            ("include_adult", "false".to_string()),
        ]
    }

    /// Empty result for pages TMDB would refuse, answered without a request
    fn past_last_page(media_type: MediaType, page: u32) -> Option<ContentPage> {
        (page > MAX_API_PAGE).then(|| {
            tracing::debug!(media_type = %media_type, page, "Page past TMDB range, skipping");
            ContentPage {
                page,
                results: Vec::new(),
                total_pages: MAX_API_PAGE,
            }
        })
    }

    /// Calls `/discover/{media_type}` and converts the response
    async fn fetch_discover(
        &self,
        media_type: MediaType,
        params: Vec<(&'static str, String)>,
    ) -> AppResult<ContentPage> {
        let url = format!("{}/discover/{}", self.api_url, media_type);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::provider(
                "tmdb",
                format!("status {}: {}", status, body),
            ));
        }

        let response_text = response.text().await?;
        let parsed: TmdbPagedResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::provider("tmdb", format!("unreadable response: {}", e))
        })?;

        Ok(parsed.into_page(media_type))
    }
}

#[async_trait::async_trait]
impl MediaProvider for TmdbProvider {
    async fn discover_by_genres(&self, query: &DiscoverQuery) -> AppResult<ContentPage> {
        if let Some(empty) = Self::past_last_page(query.media_type, query.page) {
            return Ok(empty);
        }

        let genre_ids = self.catalog.translate_ids(&query.genre_ids, query.media_type);
        if genre_ids.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "No {} genres match {:?}",
                query.media_type, query.genre_ids
            )));
        }

        let params = self.discover_params(query, &genre_ids);

        cached!(
            self.cache,
            CacheKey::Discover(query.cache_key()),
            DISCOVER_CACHE_TTL,
            async move {
                let page = self.fetch_discover(query.media_type, params).await?;

                tracing::info!(
                    media_type = %query.media_type,
                    genres = ?genre_ids,
                    page = query.page,
                    sort_by = %query.sort_by,
                    results = page.results.len(),
                    provider = "tmdb",
                    "Discover page fetched"
                );

                Ok::<_, AppError>(page)
            }
        )
    }

    async fn top_rated_by_genre(
        &self,
        genre_id: u32,
        media_type: MediaType,
        page: u32,
    ) -> AppResult<ContentPage> {
        let page = page.max(1);
        if let Some(empty) = Self::past_last_page(media_type, page) {
            return Ok(empty);
        }

        let query = DiscoverQuery {
            genre_ids: vec![genre_id],
            media_type,
            min_rating: 0.0,
            min_vote_count: TOP_RATED_MIN_VOTES,
            page,
            sort_by: SortBy::RatingDesc,
        };

        let genre_ids = self.catalog.translate_ids(&query.genre_ids, media_type);
        if genre_ids.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Genre {} has no {} equivalent",
                genre_id, media_type
            )));
        }

        let params = self.discover_params(&query, &genre_ids);

        cached!(
            self.cache,
            CacheKey::TopRated(format!("{}:{}:{}", media_type, genre_id, page)),
            TOP_RATED_CACHE_TTL,
            async move {
                let page = self.fetch_discover(media_type, params).await?;

                tracing::info!(
                    media_type = %media_type,
                    genre_id,
                    results = page.results.len(),
                    provider = "tmdb",
                    "Top rated page fetched"
                );

                Ok::<_, AppError>(page)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
