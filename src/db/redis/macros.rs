/// Read-through caching for provider responses.
///
/// Looks the key up in the cache and returns the hit. On a miss, or when the
/// cache itself cannot be read, awaits `$block`, schedules the value to be
/// written in the background and returns it. A broken cache therefore only
/// costs an extra upstream call, never a failed request.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache) (anything with `get_from_cache` and
///   `set_in_background`).
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live of the written value, in seconds.
/// * `$block`: future producing `Result<T, AppError>` on a miss.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Discover(query.cache_key()), DISCOVER_CACHE_TTL, async move {
///     self.fetch_discover(query).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, falling through");
                None
            }
        };

        if let Some(cached) = hit {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
