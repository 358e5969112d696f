//! Route definitions for the `/recipes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::recipes;
use crate::state::AppState;

/// Routes mounted at `/recipes`.
///
/// ```text
/// GET    /            -> list_recipes
/// POST   /            -> create_recipe
/// POST   /generate    -> generate_recipe
/// GET    /{id}        -> get_recipe
/// DELETE /{id}        -> delete_recipe
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list_recipes).post(recipes::create_recipe))
        .route("/generate", post(recipes::generate_recipe))
        .route(
            "/{id}",
            get(recipes::get_recipe).delete(recipes::delete_recipe),
        )
}
