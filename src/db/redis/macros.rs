/// Read-through caching around a fallible async block.
///
/// On a hit the cached value is returned. On a miss (or an unreachable cache)
/// the block runs, and a successful result is queued for writing with the given
/// TTL in seconds. Errors from the block propagate and are never cached.
///
/// # Example
/// ```rust,ignore
/// let movies: Vec<SimilarMovie> = cached!(
///     self.cache,
///     CacheKey::SimilarMovies(movie_id.to_string()),
///     SIMILAR_CACHE_TTL,
///     async move { self.fetch_similar(movie_id).await }
/// )?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.lookup(&key).await {
            Some(hit) => Ok(hit),
            None => match $block.await {
                Ok(value) => {
                    $cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
