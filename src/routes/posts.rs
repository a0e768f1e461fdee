use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::{CurrentUser, MaybeUser},
    models::{MovieRef, PostView, ReactionSummary},
    routes::{parse_id, AppState},
    services::{
        comments::{self, CommentView},
        reactions, reports,
    },
};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub movie: MovieRef,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub disliked: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(request): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<PostView>)> {
    let post = reactions::create_post(
        state.store.as_ref(),
        &identity.user_id,
        request.movie,
        &request.content,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(PostView::new(post, Some(&identity.user_id))),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    MaybeUser(identity): MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostView>> {
    let post_id = parse_id(&id)?;
    let viewer = identity.map(|i| i.user_id);
    let view = reactions::get_post_view(state.store.as_ref(), &post_id, viewer.as_ref()).await?;
    Ok(Json(view))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let post_id = parse_id(&id)?;
    reactions::delete_post(
        state.store.as_ref(),
        &post_id,
        &identity.user_id,
        identity.is_admin,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_reaction(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<ReactionRequest>,
) -> AppResult<Json<ReactionSummary>> {
    let post_id = parse_id(&id)?;
    let summary = reactions::set_post_reaction(
        state.store.as_ref(),
        &post_id,
        &identity.user_id,
        request.liked,
        request.disliked,
    )
    .await?;
    Ok(Json(summary))
}

pub async fn reaction_counts(
    State(state): State<AppState>,
    MaybeUser(identity): MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Json<ReactionSummary>> {
    let post_id = parse_id(&id)?;
    let viewer = identity.map(|i| i.user_id);
    let summary =
        reactions::get_post_reaction_counts(state.store.as_ref(), &post_id, viewer.as_ref())
            .await?;
    Ok(Json(summary))
}

pub async fn report(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let post_id = parse_id(&id)?;
    reports::report_post(state.store.as_ref(), &post_id).await?;
    tracing::debug!(post_id = %post_id, reporter = %identity.user_id, "Report received");
    Ok(Json(json!({ "status": "reported" })))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentView>>> {
    let post_id = parse_id(&id)?;
    let views = comments::comments_for_post(state.store.as_ref(), &post_id).await?;
    Ok(Json(views))
}

pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<CommentView>)> {
    let post_id = parse_id(&id)?;
    let comment = comments::create_comment(
        state.store.as_ref(),
        &post_id,
        &identity.user_id,
        &request.content,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
