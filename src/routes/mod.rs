use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Store,
    error::AppResult,
    middleware::{auth_middleware, make_span_with_request_id, request_id_middleware, TokenKeys},
    models::EntityId,
    services::providers::MovieProvider,
};

pub mod admin;
pub mod comments;
pub mod movies;
pub mod polls;
pub mod posts;
pub mod profile;
pub mod recommendations;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub provider: Arc<dyn MovieProvider>,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, provider: Arc<dyn MovieProvider>, tokens: TokenKeys) -> Self {
        Self {
            store,
            provider,
            tokens,
        }
    }
}

/// Parses an id taken from the request path
pub(crate) fn parse_id(raw: &str) -> AppResult<EntityId> {
    raw.parse()
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Posts
        .route("/posts", post(posts::create))
        .route("/posts/:id", get(posts::get).delete(posts::remove))
        .route("/posts/:id/reaction", put(posts::set_reaction))
        .route("/posts/:id/reactions", get(posts::reaction_counts))
        .route("/posts/:id/report", post(posts::report))
        .route(
            "/posts/:id/comments",
            get(posts::list_comments).post(posts::create_comment),
        )
        // Comments
        .route(
            "/comments/:id",
            put(comments::update).delete(comments::remove),
        )
        .route("/comments/:id/like", post(comments::like))
        .route("/comments/:id/dislike", post(comments::dislike))
        // Movies and polls
        .route("/movies/search", get(movies::search))
        .route("/movies/:movie_id/similar", get(movies::similar))
        .route(
            "/movies/:movie_id/polls",
            get(movies::list_polls).post(movies::create_poll),
        )
        .route("/polls/:id/vote", post(polls::vote))
        // Profile
        .route(
            "/profile/follow/:id",
            post(profile::follow).delete(profile::unfollow),
        )
        .route("/profile/movies/:list", post(profile::add_movie))
        .route("/profile/movies/:list/:movie_id", delete(profile::remove_movie))
        // Recommendations
        .route("/recommendations/:source", get(recommendations::recommend))
        // Moderation
        .route("/admin/reports", get(admin::list_reports))
        .route("/admin/reports/:post_id", delete(admin::dismiss))
        .route("/admin/reports/:post_id/post", delete(admin::resolve))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
