use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{MovieList, SimilarMovie},
    routes::AppState,
    services::recommendations::{self, RecommendationSource},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Ok,
    EmptyHistory,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub status: RecommendationStatus,
    pub movie_ids: Vec<String>,
    /// Provider records, only for the watched and watchlist sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<SimilarMovie>>,
}

impl RecommendationResponse {
    fn empty() -> Self {
        Self {
            status: RecommendationStatus::EmptyHistory,
            movie_ids: Vec::new(),
            movies: None,
        }
    }
}

/// Handler for recommendations endpoint
///
/// An empty seed list is a normal outcome and answers 200 with
/// `status: "empty_history"`.
pub async fn recommend(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(source): Path<String>,
) -> AppResult<Json<RecommendationResponse>> {
    let source: RecommendationSource = source.parse()?;
    let store = state.store.as_ref();
    let provider = state.provider.as_ref();

    let result = match source {
        RecommendationSource::OwnWatched | RecommendationSource::OwnWatchlist => {
            let list = if source == RecommendationSource::OwnWatched {
                MovieList::Watched
            } else {
                MovieList::Watchlist
            };
            recommendations::recommend_from_history(store, provider, &identity.user_id, list)
                .await
                .map(|movies| RecommendationResponse {
                    status: RecommendationStatus::Ok,
                    movie_ids: movies.iter().map(SimilarMovie::canonical_id).collect(),
                    movies: Some(movies),
                })
        }
        RecommendationSource::Following | RecommendationSource::Followers => {
            recommendations::recommend_for(store, provider, &identity.user_id, source)
                .await
                .map(|movie_ids| RecommendationResponse {
                    status: RecommendationStatus::Ok,
                    movie_ids,
                    movies: None,
                })
        }
    };

    match result {
        Ok(response) => Ok(Json(response)),
        Err(AppError::EmptyHistory(reason)) => {
            tracing::debug!(user_id = %identity.user_id, source = source.as_str(), %reason, "Nothing to recommend from");
            Ok(Json(RecommendationResponse::empty()))
        }
        Err(e) => Err(e),
    }
}
