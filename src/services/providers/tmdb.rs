//! TMDB (The Movie Database) v3 provider
//!
//! Supplies similarity lists, title search and id validation.
//!
//! API Flow:
//! 1. Similar: /movie/{id}/similar → ranked list of related movies
//! 2. Search: /search/movie?query= → matching movies
//! 3. Exists: /movie/{id} → 200 when the id is known, 404 otherwise
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieSummary, SimilarMovie, TmdbMovie, TmdbPage},
    services::providers::{with_retry, MovieProvider},
};
use reqwest::{Client as HttpClient, Response, StatusCode};

const SIMILAR_CACHE_TTL: u64 = 86400; // 1 day
const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const EXISTS_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    max_retries: u32,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, max_retries: u32) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            max_retries,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Turns a non-success status into an upstream failure
    async fn ensure_success(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(upstream_error(status, &body))
    }

    async fn fetch_similar(&self, movie_id: &str) -> AppResult<Vec<SimilarMovie>> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("movie/{}/similar", movie_id)))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let page: TmdbPage<TmdbMovie> = Self::ensure_success(response).await?.json().await?;
        Ok(page.results.into_iter().map(SimilarMovie::from).collect())
    }

    async fn fetch_search(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let response = self
            .http_client
            .get(self.endpoint("search/movie"))
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await?;

        let page: TmdbPage<TmdbMovie> = Self::ensure_success(response).await?.json().await?;
        Ok(page.results.into_iter().map(MovieSummary::from).collect())
    }

    async fn fetch_exists(&self, movie_id: &str) -> AppResult<bool> {
        let response = self
            .http_client
            .get(self.endpoint(&format!("movie/{}", movie_id)))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::ensure_success(response).await?;
        Ok(true)
    }
}

fn upstream_error(status: StatusCode, body: &str) -> AppError {
    AppError::UpstreamUnavailable(format!("TMDB API returned status {}: {}", status, body))
}

/// TMDB ids are positive integers; anything else cannot name a movie
fn is_tmdb_id(movie_id: &str) -> bool {
    movie_id.parse::<u64>().map(|id| id > 0).unwrap_or(false)
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn similar_movies(&self, movie_id: &str) -> AppResult<Vec<SimilarMovie>> {
        if !is_tmdb_id(movie_id) {
            return Err(AppError::InvalidIdentifier(movie_id.to_string()));
        }

        cached!(
            self.cache,
            CacheKey::SimilarMovies(movie_id.to_string()),
            SIMILAR_CACHE_TTL,
            async move {
                let movies = with_retry("similar_movies", self.max_retries, || {
                    self.fetch_similar(movie_id)
                })
                .await?;

                tracing::info!(
                    movie_id = %movie_id,
                    results = movies.len(),
                    provider = "tmdb",
                    "Similar movies fetched"
                );

                Ok(movies)
            }
        )
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let movies =
                    with_retry("search_movies", self.max_retries, || self.fetch_search(query))
                        .await?;

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok(movies)
            }
        )
    }

    async fn movie_exists(&self, movie_id: &str) -> AppResult<bool> {
        if !is_tmdb_id(movie_id) {
            return Ok(false);
        }

        cached!(
            self.cache,
            CacheKey::MovieExists(movie_id.to_string()),
            EXISTS_CACHE_TTL,
            with_retry("movie_exists", self.max_retries, || self.fetch_exists(movie_id))
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;

    async fn create_test_provider(api_url: &str) -> TmdbProvider {
        let client = create_redis_client("redis://localhost:6379").unwrap();
        let (cache, _handle) = Cache::new(client).await;
        TmdbProvider::new(cache, "test_key".to_string(), api_url.to_string(), 0)
    }

    #[tokio::test]
    async fn test_endpoint_joins_without_double_slash() {
        let provider = create_test_provider("http://test.local/3/").await;
        assert_eq!(
            provider.endpoint("/movie/603/similar"),
            "http://test.local/3/movie/603/similar"
        );
        assert_eq!(provider.endpoint("search/movie"), "http://test.local/3/search/movie");
    }

    #[test]
    fn test_is_tmdb_id() {
        assert!(is_tmdb_id("603"));
        assert!(!is_tmdb_id("0"));
        assert!(!is_tmdb_id("-5"));
        assert!(!is_tmdb_id("tt0133093"));
        assert!(!is_tmdb_id(""));
    }

    #[test]
    fn test_upstream_error_is_upstream() {
        let error = upstream_error(StatusCode::SERVICE_UNAVAILABLE, "maintenance");
        assert!(error.is_upstream());
        assert!(error.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let provider = create_test_provider("http://test.local/3").await;
        let result = provider.search_movies("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_similar_rejects_malformed_id() {
        let provider = create_test_provider("http://test.local/3").await;
        let result = provider.similar_movies("abc").await;
        assert!(matches!(result, Err(AppError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn test_exists_false_for_malformed_id() {
        let provider = create_test_provider("http://test.local/3").await;
        assert!(!provider.movie_exists("not-a-number").await.unwrap());
    }
}
