//! Handlers for the `/auth` resource (login, register, logout).
//!
//! Supabase owns credentials and sessions. These handlers validate the
//! request body, forward it to GoTrue, translate failures into form-ready
//! messages, and keep the session cookies in step.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum_extra::extract::CookieJar;
use savor_core::auth::{classify_auth_error, AuthFailureKind, LoginCommand, RegisterCommand};
use savor_core::validation::validate_request;
use savor_supabase::SupabaseError;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::bearer_token;
use crate::middleware::session::{
    clear_session_cookies, set_session_cookies, SessionUser, ACCESS_TOKEN_COOKIE,
};
use crate::response::{SuccessResponse, UserResponse};
use crate::state::AppState;

/// Translate a GoTrue error from sign-in or sign-up.
///
/// 4xx answers carry a reason worth showing the user; transport failures and
/// 5xx stay upstream errors.
fn auth_error(err: SupabaseError) -> AppError {
    match &err {
        SupabaseError::Api {
            status,
            code,
            message,
        } if (400..500).contains(status) => {
            let raw = match code {
                Some(code) => format!("{code}: {message}"),
                None => message.clone(),
            };
            let failure = classify_auth_error(&raw);
            if failure.kind == AuthFailureKind::Other {
                tracing::warn!(status, raw = %raw, "Unrecognized auth error");
            }
            AppError::Auth(failure)
        }
        _ => AppError::Supabase(err),
    }
}

/// POST /api/auth/login
///
/// Sign in with email + password. Sets the session cookies and returns the user.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<LoginCommand>,
) -> AppResult<impl IntoResponse> {
    let input = input.trimmed();
    validate_request(&input)?;

    let session = state
        .supabase
        .sign_in_with_password(&input.email, &input.password)
        .await
        .map_err(auth_error)?;

    tracing::info!(user_id = %session.user.id, "User signed in");

    let jar = set_session_cookies(jar, &session, state.config.cookie_secure);
    Ok((
        jar,
        AppJson(UserResponse {
            user: session.user.into(),
        }),
    ))
}

/// POST /api/auth/register
///
/// Create an account. Returns 201 with the user. When Supabase requires email
/// confirmation no session comes back and no cookies are set; the user signs
/// in after confirming.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<RegisterCommand>,
) -> AppResult<impl IntoResponse> {
    let input = input.trimmed();
    validate_request(&input)?;

    let redirect_to = state.config.email_redirect_url();
    let result = state
        .supabase
        .sign_up(&input.email, &input.password, redirect_to.as_deref())
        .await
        .map_err(auth_error)?;

    let jar = match &result.session {
        Some(session) => set_session_cookies(jar, session, state.config.cookie_secure),
        None => jar,
    };

    tracing::info!(
        user_id = %result.user.id,
        confirmed = result.session.is_some(),
        "User registered"
    );

    Ok((
        StatusCode::CREATED,
        jar,
        AppJson(UserResponse {
            user: result.user.into(),
        }),
    ))
}

/// POST /api/auth/logout
///
/// Revoke the session at Supabase (best effort) and clear the cookies.
/// Succeeds even without a session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Option<SessionUser>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> impl IntoResponse {
    // Prefer the resolved session: its token may have just been refreshed.
    let token = session
        .map(|user| user.access_token)
        .or_else(|| jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_owned()))
        .or_else(|| bearer_token(&headers).map(str::to_owned));

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        if let Err(err) = state.supabase.sign_out(&token).await {
            tracing::warn!(error = %err, "Supabase sign-out failed; clearing cookies anyway");
        }
    }

    (
        clear_session_cookies(jar),
        AppJson(SuccessResponse { success: true }),
    )
}
