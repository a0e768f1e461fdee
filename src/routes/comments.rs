use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    routes::{parse_id, AppState},
    services::comments::{self, CommentView},
};

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateCommentRequest>,
) -> AppResult<Json<CommentView>> {
    let comment_id = parse_id(&id)?;
    let view = comments::update_comment(
        state.store.as_ref(),
        &comment_id,
        &identity.user_id,
        &request.content,
    )
    .await?;
    Ok(Json(view))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let comment_id = parse_id(&id)?;
    comments::delete_comment(state.store.as_ref(), &comment_id, &identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<CommentView>> {
    let comment_id = parse_id(&id)?;
    let view = comments::like_comment(state.store.as_ref(), &comment_id, &identity.user_id).await?;
    Ok(Json(view))
}

pub async fn dislike(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<CommentView>> {
    let comment_id = parse_id(&id)?;
    let view =
        comments::dislike_comment(state.store.as_ref(), &comment_id, &identity.user_id).await?;
    Ok(Json(view))
}
