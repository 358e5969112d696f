//! Authentication extractor for API handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use savor_core::error::CoreError;
use savor_core::types::UserId;

use crate::error::AppError;
use crate::middleware::session::SessionUser;
use crate::state::AppState;

/// The signed-in user making an API request.
///
/// Taken from the cookie session resolved by
/// [`resolve_session`](crate::middleware::session::resolve_session), or, for
/// non-browser clients, from an `Authorization: Bearer <access token>` header
/// checked against Supabase.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: Option<String>,
    /// Forwarded to PostgREST so row-level security applies.
    pub access_token: String,
}

impl From<SessionUser> for AuthUser {
    fn from(session: SessionUser) -> Self {
        Self {
            user_id: session.id,
            email: session.email,
            access_token: session.access_token,
        }
    }
}

fn unauthenticated() -> AppError {
    AppError::Core(CoreError::Unauthorized("Authentication required".into()))
}

/// Bearer token from the `Authorization` header, if well-formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(Some(session)) = parts.extensions.get::<Option<SessionUser>>() {
            return Ok(session.clone().into());
        }

        let token = bearer_token(&parts.headers).ok_or_else(unauthenticated)?;

        match state.supabase.get_user(token).await {
            Ok(user) => Ok(AuthUser {
                user_id: user.id,
                email: user.email,
                access_token: token.to_owned(),
            }),
            Err(err) if err.is_auth_rejection() => Err(AppError::Core(CoreError::Unauthorized(
                "Invalid or expired token".into(),
            ))),
            Err(err) => Err(err.into()),
        }
    }
}
