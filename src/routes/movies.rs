use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::{MovieSummary, Poll, SimilarMovie},
    routes::AppState,
    services::polls,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Handler for movie search endpoint
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state.provider.search_movies(&params.q).await?;
    Ok(Json(movies))
}

pub async fn similar(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<SimilarMovie>>> {
    let movies = state.provider.similar_movies(&movie_id).await?;
    Ok(Json(movies))
}

pub async fn list_polls(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<Poll>>> {
    let found = polls::polls_for_movie(state.store.as_ref(), &movie_id).await?;
    Ok(Json(found))
}

pub async fn create_poll(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(movie_id): Path<String>,
    Json(request): Json<CreatePollRequest>,
) -> AppResult<(StatusCode, Json<Poll>)> {
    let poll = polls::create_poll(
        state.store.as_ref(),
        &movie_id,
        &request.question,
        &request.options,
    )
    .await?;
    tracing::debug!(poll_id = %poll.id, created_by = %identity.user_id, "Poll created via API");
    Ok((StatusCode::CREATED, Json(poll)))
}
