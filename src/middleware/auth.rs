//! Identity resolution
//!
//! A signed token (HS256, `sub` = user id) is read from the `token` cookie or
//! an `Authorization: Bearer` header. When it verifies and names a stored user,
//! an [`Identity`] is placed in the request extensions. Requests without a
//! usable token pass through anonymously; handlers decide whether that is
//! acceptable by choosing [`CurrentUser`] or [`MaybeUser`].

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::EntityId,
    routes::AppState,
};

/// Cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// The authenticated caller of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: EntityId,
    pub is_admin: bool,
}

impl Identity {
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Administrator access required".to_string()))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Signing and verification keys derived from the shared secret
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for `user_id` valid for `ttl_seconds`
    pub fn issue(&self, user_id: &EntityId, ttl_seconds: i64) -> AppResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: Utc::now().timestamp() + ttl_seconds,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Returns the user id named by a valid, unexpired token
    pub fn verify(&self, token: &str) -> Option<EntityId> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| tracing::debug!(error = %e, "Rejected token"))
            .ok()?;
        data.claims.sub.parse().ok()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Resolves the caller's identity and stores it in the request extensions
pub async fn auth_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let token = bearer_token(&parts).map(str::to_string).or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    });

    if let Some(user_id) = token.as_deref().and_then(|t| state.tokens.verify(t)) {
        match state.store.get_user(&user_id).await {
            Ok(user) => {
                parts.extensions.insert(Identity {
                    user_id: user.id,
                    is_admin: user.is_admin,
                });
            }
            Err(AppError::NotFound(_)) => {
                tracing::debug!(user_id = %user_id, "Token names an unknown user");
            }
            Err(e) => {
                tracing::error!(error = %e, "Identity lookup failed");
                return e.into_response();
            }
        }
    }

    next.run(Request::from_parts(parts, body)).await
}

/// Extractor for handlers that require a signed-in caller
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Extractor for handlers that also serve anonymous callers
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Identity>().copied()))
    }
}
