use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::ReportedPost,
    routes::{parse_id, AppState},
    services::reports,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    limit: Option<usize>,
}

pub async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<ReportedPost>>> {
    identity.require_admin()?;
    let reported = reports::list_reported_posts(state.store.as_ref(), params.limit).await?;
    Ok(Json(reported))
}

/// Drops the report and keeps the post
pub async fn dismiss(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(post_id): Path<String>,
) -> AppResult<StatusCode> {
    identity.require_admin()?;
    let post_id = parse_id(&post_id)?;
    reports::dismiss_report(state.store.as_ref(), &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes the reported post along with its report
pub async fn resolve(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(post_id): Path<String>,
) -> AppResult<StatusCode> {
    identity.require_admin()?;
    let post_id = parse_id(&post_id)?;
    reports::resolve_reported_post(state.store.as_ref(), &post_id).await?;
    tracing::info!(post_id = %post_id, admin = %identity.user_id, "Reported post removed");
    Ok(StatusCode::NO_CONTENT)
}
