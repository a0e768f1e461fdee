//! Movie metadata provider abstraction
//!
//! The recommendation generator only needs "movies similar to X"; search and
//! id validation ride along because they come from the same upstream API.

use std::future::Future;
use std::time::Duration;

use crate::{
    error::AppResult,
    models::{MovieSummary, SimilarMovie},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Movies similar to `movie_id`, in the provider's ranking order
    async fn similar_movies(&self, movie_id: &str) -> AppResult<Vec<SimilarMovie>>;

    /// Search for movies by title
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Whether the provider knows this movie id
    async fn movie_exists(&self, movie_id: &str) -> AppResult<bool>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Base delay before the first retry; doubles on each further attempt
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Upper bound on a single backoff sleep
const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

fn backoff_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_RETRY_DELAY)
}

/// Runs `call`, retrying up to `max_retries` more times while it fails with an
/// upstream error. Any other error is returned immediately.
pub async fn with_retry<T, F, Fut>(operation: &str, max_retries: u32, mut call: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_upstream() && attempt < max_retries => {
                let delay = backoff_delay(attempt);
                attempt += 1;
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Provider call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
