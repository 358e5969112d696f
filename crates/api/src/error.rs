use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use savor_ai::AiError;
use savor_core::auth::{AuthFailure, AuthFailureKind};
use savor_core::cursor::CursorError;
use savor_core::error::CoreError;
use savor_supabase::SupabaseError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the error types of the two
/// upstream services. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `savor_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A Supabase call failed outside the auth endpoints.
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Recipe generation failed.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// A classified sign-in / sign-up failure.
    #[error("Auth failure: {}", .0.message)]
    Auth(AuthFailure),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";
const UPSTREAM_MESSAGE: &str = "An upstream service is unavailable. Please try again later.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            AppError::Supabase(err) => classify_supabase_error(err),
            AppError::Ai(err) => classify_ai_error(err),
            AppError::Auth(failure) => classify_auth_failure(failure),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a data-path Supabase error to a status, code, and message.
///
/// - 401 means the user's token was rejected: the client must sign in again.
/// - 403 is a row-level security denial.
/// - Anything else is an upstream failure (502), logged with full detail.
fn classify_supabase_error(err: &SupabaseError) -> (StatusCode, &'static str, String) {
    match err.status() {
        Some(401) => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Your session has expired. Please sign in again.".to_string(),
        ),
        Some(403) => (
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "You do not have access to this resource".to_string(),
        ),
        _ => {
            tracing::error!(error = %err, "Supabase request failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                UPSTREAM_MESSAGE.to_string(),
            )
        }
    }
}

fn classify_ai_error(err: &AiError) -> (StatusCode, &'static str, String) {
    match err {
        AiError::RateLimited { retry_after_secs } => {
            tracing::warn!(?retry_after_secs, "AI provider rate limited");
            (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Recipe generation is busy. Please try again in a moment.".to_string(),
            )
        }
        AiError::ParseError(_) | AiError::InvalidRecipe(_) => {
            tracing::warn!(error = %err, "AI provider returned an unusable recipe");
            (
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILED",
                "Could not generate a valid recipe. Please try again.".to_string(),
            )
        }
        AiError::RequestFailed(_) | AiError::ApiError { .. } => {
            tracing::error!(error = %err, "AI provider request failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                UPSTREAM_MESSAGE.to_string(),
            )
        }
        AiError::NotConfigured(_) => {
            tracing::error!(error = %err, "AI provider misconfigured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

fn classify_auth_failure(failure: &AuthFailure) -> (StatusCode, &'static str, String) {
    let (status, code) = match failure.kind {
        AuthFailureKind::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        AuthFailureKind::EmailNotConfirmed => (StatusCode::FORBIDDEN, "EMAIL_NOT_CONFIRMED"),
        AuthFailureKind::UserAlreadyExists => (StatusCode::CONFLICT, "USER_ALREADY_EXISTS"),
        AuthFailureKind::WeakPassword => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        AuthFailureKind::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        AuthFailureKind::Other => (StatusCode::BAD_REQUEST, "AUTH_FAILED"),
    };
    (status, code, failure.message.clone())
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<CursorError> for AppError {
    fn from(err: CursorError) -> Self {
        AppError::Core(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
