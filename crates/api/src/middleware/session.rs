//! Cookie session middleware.
//!
//! Runs on every request. The Supabase access and refresh tokens live in two
//! HttpOnly cookies; this middleware turns them into an optional
//! [`SessionUser`] stored in the request extensions, then decides whether the
//! request may proceed.
//!
//! # Session flow
//!
//! 1. The access token is checked with Supabase (`GET /auth/v1/user`).
//! 2. If Supabase rejects it (expired, revoked) and a refresh token is
//!    present, the session is refreshed and both cookies are re-set on the
//!    response.
//! 3. If the refresh token is rejected too, both cookies are cleared.
//!
//! # Redirects
//!
//! - No user, and the path is not public, not under `/api` and not under
//!   `/app`: 303 to `/login`. API handlers enforce auth themselves through
//!   [`AuthUser`](crate::middleware::auth::AuthUser).
//! - A signed-in user opening `/login` or `/register`: 303 to `/recipes`.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use savor_core::types::UserId;
use savor_supabase::{AuthSession, SupabaseError, SupabaseUser};

use crate::state::AppState;

/// Cookie holding the Supabase access token (JWT).
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Cookie holding the Supabase refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Refresh tokens outlive access tokens; the cookie is kept this long.
const REFRESH_COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Where unauthenticated page requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where signed-in users visiting the login or register page are sent.
pub const HOME_PATH: &str = "/recipes";

/// Pages reachable without a session.
const PUBLIC_PATHS: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/auth/callback",
    "/health",
];

/// Static asset prefixes. Public, and skipped by session resolution.
const ASSET_PREFIXES: &[&str] = &["/assets/", "/static/", "/favicon", "/robots.txt"];

/// Liveness check; answered without touching Supabase.
const HEALTH_PATH: &str = "/health";

/// User context injected into request extensions as `Option<SessionUser>`.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: UserId,
    pub email: Option<String>,
    /// The (possibly just refreshed) access token, forwarded to PostgREST so
    /// row-level security sees the user.
    pub access_token: String,
}

impl SessionUser {
    fn new(user: SupabaseUser, access_token: String) -> Self {
        Self {
            id: user.id,
            email: user.email,
            access_token,
        }
    }
}

// ---------------------------------------------------------------------------
// Path rules
// ---------------------------------------------------------------------------

pub fn is_asset_path(path: &str) -> bool {
    ASSET_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// True when `path` or any of its segment-wise parents equals `prefix`.
fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Paths served without resolving the session at all.
fn skips_session_lookup(path: &str) -> bool {
    path == HEALTH_PATH || is_asset_path(path)
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || is_asset_path(path)
}

/// Whether an anonymous request for `path` must be redirected to the login page.
pub fn requires_login(path: &str) -> bool {
    !(is_public_path(path) || is_under(path, "/api") || is_under(path, "/app"))
}

fn is_auth_page(path: &str) -> bool {
    path == "/login" || path == "/register"
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

/// Add both session cookies for `session` to `jar`.
pub fn set_session_cookies(jar: CookieJar, session: &AuthSession, secure: bool) -> CookieJar {
    let access = Cookie::build((ACCESS_TOKEN_COOKIE, session.access_token.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(session.expires_in.max(0)))
        .build();

    let refresh = Cookie::build((REFRESH_TOKEN_COOKIE, session.refresh_token.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(REFRESH_COOKIE_MAX_AGE_DAYS))
        .build();

    jar.add(access).add(refresh)
}

/// Expire both session cookies.
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"))
}

/// Whether a handler already wrote session cookies into `response`.
fn sets_session_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| {
            v.starts_with(&format!("{ACCESS_TOKEN_COOKIE}="))
                || v.starts_with(&format!("{REFRESH_TOKEN_COOKIE}="))
        })
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

/// Resolve the cookie session, apply the redirect rules, and inject
/// `Option<SessionUser>` into the request extensions.
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(routes)
///     .layer(axum::middleware::from_fn_with_state(state.clone(), resolve_session));
/// ```
pub async fn resolve_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();

    let (user, jar) = if skips_session_lookup(&path) {
        (None, jar)
    } else {
        load_session(&state, jar).await
    };

    if user.is_none() && requires_login(&path) {
        tracing::debug!(%path, "No session, redirecting to login");
        return (jar, Redirect::to(LOGIN_PATH)).into_response();
    }
    if user.is_some() && is_auth_page(&path) {
        return (jar, Redirect::to(HOME_PATH)).into_response();
    }

    req.extensions_mut().insert(user);
    let response = next.run(req).await;

    // Login, register and logout write their own cookies; those win.
    if sets_session_cookie(&response) {
        response
    } else {
        (jar, response).into_response()
    }
}

/// Turn the cookies in `jar` into a user, refreshing when needed.
///
/// Returns the jar with any cookie changes to send back.
async fn load_session(state: &AppState, jar: CookieJar) -> (Option<SessionUser>, CookieJar) {
    let access_token = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_owned());
    let refresh_token = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_owned());

    if let Some(token) = access_token.filter(|t| !t.is_empty()) {
        match state.supabase.get_user(&token).await {
            Ok(user) => return (Some(SessionUser::new(user, token)), jar),
            Err(err) if err.is_auth_rejection() => {
                tracing::debug!("Access token rejected, trying refresh");
            }
            Err(err) => {
                // Supabase unreachable: treat as anonymous but keep cookies.
                tracing::warn!(error = %err, "Session lookup failed");
                return (None, jar);
            }
        }
    }

    let Some(refresh) = refresh_token.filter(|t| !t.is_empty()) else {
        return (None, jar);
    };

    match state.supabase.refresh_session(&refresh).await {
        Ok(session) => {
            tracing::debug!(user_id = %session.user.id, "Session refreshed");
            let jar = set_session_cookies(jar, &session, state.config.cookie_secure);
            let user = SessionUser::new(session.user, session.access_token);
            (Some(user), jar)
        }
        Err(err) if is_invalid_refresh(&err) => {
            tracing::debug!(error = %err, "Refresh token rejected, clearing session");
            (None, clear_session_cookies(jar))
        }
        Err(err) => {
            tracing::warn!(error = %err, "Session refresh failed");
            (None, jar)
        }
    }
}

/// GoTrue answers a bad refresh token with 400 `invalid_grant`, sometimes 401.
fn is_invalid_refresh(err: &SupabaseError) -> bool {
    matches!(err.status(), Some(400 | 401 | 403))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_and_assets_skip_session_lookup() {
        assert!(skips_session_lookup("/health"));
        assert!(skips_session_lookup("/assets/site.css"));
        assert!(!skips_session_lookup("/"));
        assert!(!skips_session_lookup("/login"));
        assert!(!skips_session_lookup("/api/recipes"));
    }

    #[test]
    fn anonymous_page_requests_need_login() {
        assert!(requires_login("/recipes"));
        assert!(requires_login("/profile"));
        assert!(requires_login("/apiary"));
        assert!(requires_login("/application"));
    }

    #[test]
    fn public_api_and_app_paths_pass() {
        for path in [
            "/",
            "/login",
            "/register",
            "/forgot-password",
            "/reset-password",
            "/auth/callback",
            "/health",
            "/api",
            "/api/recipes",
            "/app",
            "/app/settings",
            "/assets/site.css",
            "/favicon.ico",
        ] {
            assert!(!requires_login(path), "{path} should not redirect");
        }
    }

    #[test]
    fn only_login_and_register_are_auth_pages() {
        assert!(is_auth_page("/login"));
        assert!(is_auth_page("/register"));
        assert!(!is_auth_page("/forgot-password"));
    }
}
