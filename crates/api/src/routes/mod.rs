pub mod auth;
pub mod health;
pub mod profile;
pub mod recipes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/login                 login (public)
/// /auth/register              register (public)
/// /auth/logout                logout
///
/// /profile                    get, update (auth required)
///
/// /recipes                    list, create (auth required)
/// /recipes/generate           generate with AI (POST)
/// /recipes/{id}               get, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/recipes", recipes::router())
}
