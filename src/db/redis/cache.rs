use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// One discover page, keyed by [`DiscoverQuery::cache_key`](crate::services::providers::DiscoverQuery::cache_key)
    Discover(String),
    /// One top-rated page, keyed by "{media_type}:{genre_id}:{page}"
    TopRated(String),
    /// Last profile built for a user id
    Profile(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Discover(query) => write!(f, "discover:{}", query),
            CacheKey::TopRated(query) => write!(f, "toprated:{}", query),
            CacheKey::Profile(user_id) => write!(f, "profile:{}", user_id),
        }
    }
}

/// Creates a Redis client for caching
///
/// Only parses the URL; no connection is made until the first command.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Pending write for the background writer
struct CacheWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed JSON cache with fire-and-forget writes
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWrite>,
}

/// Handle for stopping the background writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer to flush queued writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates the cache and spawns its writer task
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(Self::run_writer(redis_client.clone(), write_rx, shutdown_rx));

        (
            Self {
                redis_client,
                write_tx,
            },
            CacheWriterHandle { shutdown_tx },
        )
    }

    /// Drains write requests until shutdown, then flushes what is left
    async fn run_writer(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed = 0usize;

        loop {
            tokio::select! {
                Some(write) = write_rx.recv() => {
                    if let Err(e) = Self::write(&client, write).await {
                        failed += 1;
                        tracing::error!(error = %e, failed, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // stop accepting new writes, keep the ones already queued
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(write) = write_rx.recv().await {
                        match Self::write(&client, write).await {
                            Ok(()) => flushed += 1,
                            Err(e) => {
                                failed += 1;
                                tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                            }
                        }
                    }

                    tracing::info!(flushed, failed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write(client: &Client, write: CacheWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(write.key, write.value, write.ttl).await?;
        Ok(())
    }

    /// Reads and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(AppError::from)
    }

    /// Queues a value to be written without waiting for Redis
    ///
    /// Serialization or queueing failures are logged and dropped.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let value = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let write = CacheWrite {
            key: key.to_string(),
            value,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::error!(key = %key, "Cache writer is gone, dropping write");
        }
    }
}
