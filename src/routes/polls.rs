use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::Poll,
    routes::{parse_id, AppState},
    services::polls,
};

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub option_id: String,
}

pub async fn vote(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<VoteRequest>,
) -> AppResult<Json<Poll>> {
    let poll_id = parse_id(&id)?;
    let poll = polls::cast_poll_vote(state.store.as_ref(), &poll_id, &request.option_id).await?;
    Ok(Json(poll))
}
