use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::{MovieList, User},
    routes::{parse_id, AppState},
    services::social,
};

#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    pub movie_id: String,
}

pub async fn follow(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let target = parse_id(&id)?;
    social::follow(state.store.as_ref(), &identity.user_id, &target).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let target = parse_id(&id)?;
    social::unfollow(state.store.as_ref(), &identity.user_id, &target).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_movie(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(list): Path<String>,
    Json(request): Json<AddMovieRequest>,
) -> AppResult<Json<User>> {
    let list: MovieList = list.parse()?;
    let user = social::add_to_list(
        state.store.as_ref(),
        state.provider.as_ref(),
        &identity.user_id,
        list,
        &request.movie_id,
    )
    .await?;
    Ok(Json(user))
}

pub async fn remove_movie(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path((list, movie_id)): Path<(String, String)>,
) -> AppResult<Json<User>> {
    let list: MovieList = list.parse()?;
    let user =
        social::remove_from_list(state.store.as_ref(), &identity.user_id, list, &movie_id).await?;
    Ok(Json(user))
}
