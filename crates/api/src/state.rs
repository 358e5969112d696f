use std::sync::Arc;

use savor_ai::RecipeGenerator;
use savor_supabase::SupabaseClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is a pooled client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Supabase auth + data client (anon key; user tokens are passed per call).
    pub supabase: SupabaseClient,
    /// Recipe generation backend selected by `AI_PROVIDER`.
    pub generator: Arc<dyn RecipeGenerator>,
}
