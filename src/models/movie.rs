use serde::{Deserialize, Serialize};

/// Movie reference embedded in posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRef {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
}

impl MovieRef {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            title: String::new(),
            poster_path: None,
            tagline: None,
        }
    }
}

/// A movie returned by the similarity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl SimilarMovie {
    /// Canonical string form used in user lists and recommendation output
    pub fn canonical_id(&self) -> String {
        self.id.to_string()
    }
}

/// A movie search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged result envelope used by TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Entry of `/movie/{id}/similar`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl From<TmdbMovie> for SimilarMovie {
    fn from(movie: TmdbMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            overview: movie.overview.filter(|o| !o.is_empty()),
        }
    }
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            // TMDB sends "" for unknown release dates
            release_date: movie.release_date.filter(|d| !d.is_empty()),
            vote_average: movie.vote_average,
            overview: movie.overview.filter(|o| !o.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_id() {
        let movie = SimilarMovie {
            id: 200,
            title: "Heat".into(),
            poster_path: None,
            overview: None,
        };
        assert_eq!(movie.canonical_id(), "200");
    }

    #[test]
    fn test_tmdb_similar_page_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 603, "title": "The Matrix", "poster_path": "/m.jpg", "overview": "Neo"},
                {"id": 604, "title": "The Matrix Reloaded", "poster_path": null, "overview": ""}
            ],
            "total_pages": 1
        }"#;

        let page: TmdbPage<TmdbMovie> = serde_json::from_str(json).unwrap();
        let movies: Vec<SimilarMovie> = page.results.into_iter().map(Into::into).collect();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 603);
        assert_eq!(movies[0].poster_path.as_deref(), Some("/m.jpg"));
        assert_eq!(movies[1].overview, None);
    }

    #[test]
    fn test_tmdb_search_hit_empty_release_date() {
        let json = r#"{"id": 1, "title": "Untitled", "release_date": "", "vote_average": 6.5}"#;
        let summary: MovieSummary = serde_json::from_str::<TmdbMovie>(json).unwrap().into();
        assert_eq!(summary.release_date, None);
        assert_eq!(summary.vote_average, Some(6.5));
    }

    #[test]
    fn test_page_without_results() {
        let page: TmdbPage<TmdbMovie> = serde_json::from_str(r#"{"page": 1}"#).unwrap();
        assert!(page.results.is_empty());
    }
}
