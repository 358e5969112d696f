//! Recipe generation via an external AI provider.
//!
//! SavorAI does not generate recipes itself. This crate builds a prompt from
//! the user's request and dietary profile, sends it to a chat-completions
//! provider, and validates what comes back as a [`RecipeSchema`].

mod fake;
mod openai;
pub mod prompt;

pub use fake::FakeGenerator;
pub use openai::OpenAiCompatibleGenerator;

use std::fmt;

use async_trait::async_trait;
use savor_core::profile::{DietType, ProfileDto};
use savor_core::recipe::RecipeSchema;
use serde::Serialize;

/// Error type for recipe generation.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    RequestFailed(String),

    #[error("AI provider returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("AI provider rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Failed to parse AI response: {0}")]
    ParseError(String),

    #[error("AI produced an invalid recipe: {0}")]
    InvalidRecipe(String),

    #[error("AI provider not configured: {0}")]
    NotConfigured(String),
}

/// Dietary constraints taken from the caller's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DietaryPreferences {
    pub diet_type: Option<DietType>,
    pub disliked_ingredients: Vec<String>,
    pub preferred_cuisines: Vec<String>,
}

impl From<&ProfileDto> for DietaryPreferences {
    fn from(profile: &ProfileDto) -> Self {
        Self {
            diet_type: profile.diet_type,
            disliked_ingredients: profile.disliked_ingredients.clone(),
            preferred_cuisines: profile.preferred_cuisines.clone(),
        }
    }
}

/// Everything a generator needs to produce one recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub servings: Option<u32>,
    pub max_total_time_minutes: Option<u32>,
    pub preferences: DietaryPreferences,
}

/// A recipe generation backend.
///
/// Implementations must be thread-safe; one instance is shared by all
/// requests.
#[async_trait]
pub trait RecipeGenerator: Send + Sync + fmt::Debug {
    /// Generate and validate a single recipe.
    async fn generate(&self, request: &GenerationRequest) -> Result<RecipeSchema, AiError>;

    /// Provider name (e.g. `"openrouter"`, `"fake"`).
    fn provider_name(&self) -> &'static str;

    /// Model identifier sent to the provider.
    fn model_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Which provider to use and how to reach it.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// `openrouter`, `openai`, or `fake`.
    pub provider: String,
    /// Model name; provider default when unset.
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Override the provider's API base URL (proxies, tests).
    pub base_url: Option<String>,
}

impl AiConfig {
    /// Load from the environment.
    ///
    /// | Env Var       | Default |
    /// |---------------|---------|
    /// | `AI_PROVIDER` | `fake`  |
    /// | `AI_MODEL`    | provider default |
    /// | `AI_API_KEY`  | --      |
    /// | `AI_BASE_URL` | provider default |
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            provider: non_empty("AI_PROVIDER").unwrap_or_else(|| "fake".into()),
            model: non_empty("AI_MODEL"),
            api_key: non_empty("AI_API_KEY"),
            base_url: non_empty("AI_BASE_URL"),
        }
    }
}

/// Build the generator selected by `config.provider`.
pub fn create_generator(config: &AiConfig) -> Result<Box<dyn RecipeGenerator>, AiError> {
    match config.provider.as_str() {
        "fake" => Ok(Box::new(FakeGenerator::default())),
        provider @ ("openrouter" | "openai") => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                AiError::NotConfigured(format!("AI_API_KEY is required for provider {provider}"))
            })?;
            let (default_url, default_model, name) = if provider == "openrouter" {
                (OPENROUTER_BASE_URL, DEFAULT_OPENROUTER_MODEL, "openrouter")
            } else {
                (OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, "openai")
            };
            let base_url = config.base_url.clone().unwrap_or_else(|| default_url.into());
            let model = config.model.clone().unwrap_or_else(|| default_model.into());
            Ok(Box::new(OpenAiCompatibleGenerator::new(
                name, base_url, api_key, model,
            )?))
        }
        other => Err(AiError::NotConfigured(format!("Unknown provider: {other}"))),
    }
}
