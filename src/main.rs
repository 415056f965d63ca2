use std::sync::Arc;

use reelscout_api::{
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState},
    services::{
        providers::tmdb::TmdbProvider, recommendations::SignalWeights, GenreCatalog,
        RecommendationService,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelscout_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = GenreCatalog::standard();
    for problem in catalog.validate() {
        tracing::warn!(problem = %problem, "Genre catalog problem");
    }

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client);

    let provider = Arc::new(TmdbProvider::new(
        cache.clone(),
        catalog,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));

    let state = Arc::new(AppState {
        recommendations: RecommendationService::new(provider, catalog, SignalWeights::default()),
        cache: Some(cache),
        profile_cache_ttl: config.profile_cache_ttl,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
