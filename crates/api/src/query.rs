//! Query parameter types for API handlers.

use serde::Deserialize;

/// Keyset pagination parameters (`?limit=&cursor=`).
///
/// `limit` is clamped by `savor_core::pagination::clamp_limit`; `cursor` is
/// the opaque `next_cursor` of the previous page.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListParams {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}
