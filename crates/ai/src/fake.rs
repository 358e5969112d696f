//! Deterministic generator for local development and tests.
//!
//! Returns a canned recipe shaped by the request, so the whole stack can run
//! without network access or an API key.

use std::sync::Mutex;

use async_trait::async_trait;
use savor_core::recipe::{validate_recipe, Nutrition, RecipeIngredient, RecipeSchema};

use crate::{AiError, GenerationRequest, RecipeGenerator};

const TITLE_PREFIX: &str = "Quick ";
const MAX_TITLE_CHARS: usize = 200;
const DEFAULT_SERVINGS: u32 = 2;
const DEFAULT_PREP: u32 = 10;
const DEFAULT_COOK: u32 = 20;
const INGREDIENT_COUNT: usize = 5;

/// Staples in order of preference; later entries stand in for disliked ones.
const PANTRY: [&str; 12] = [
    "rice",
    "onion",
    "garlic",
    "olive oil",
    "spinach",
    "potato",
    "carrot",
    "lentils",
    "tomato",
    "chickpeas",
    "zucchini",
    "salt",
];

enum Canned {
    Recipe(RecipeSchema),
    Error(fn() -> AiError),
}

/// A fake generator.
///
/// By default it builds a recipe from the request: the prompt becomes the
/// title, requested servings and time limit are honored, and disliked
/// ingredients never appear. Use [`FakeGenerator::with_recipe`] or
/// [`FakeGenerator::failing`] to pin the outcome.
///
/// Requests are only kept when built with [`FakeGenerator::recording`].
#[derive(Default)]
pub struct FakeGenerator {
    canned: Option<Canned>,
    requests: Option<Mutex<Vec<GenerationRequest>>>,
}

impl std::fmt::Debug for FakeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeGenerator")
            .field("canned", &self.canned.is_some())
            .field("recording", &self.requests.is_some())
            .finish_non_exhaustive()
    }
}

impl FakeGenerator {
    /// Always return `recipe`.
    pub fn with_recipe(recipe: RecipeSchema) -> Self {
        Self {
            canned: Some(Canned::Recipe(recipe)),
            ..Default::default()
        }
    }

    /// Always fail with the error produced by `make_error`.
    pub fn failing(make_error: fn() -> AiError) -> Self {
        Self {
            canned: Some(Canned::Error(make_error)),
            ..Default::default()
        }
    }

    /// Build recipes from the request and keep every request for inspection.
    pub fn recording() -> Self {
        Self {
            requests: Some(Mutex::default()),
            ..Default::default()
        }
    }

    /// Requests received so far, oldest first. Empty unless recording.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .as_ref()
            .map(|requests| {
                requests
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .clone()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecipeGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<RecipeSchema, AiError> {
        if let Some(requests) = &self.requests {
            requests
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(request.clone());
        }

        match &self.canned {
            Some(Canned::Recipe(recipe)) => Ok(recipe.clone()),
            Some(Canned::Error(make_error)) => Err(make_error()),
            None => {
                let recipe = recipe_for(request);
                validate_recipe(&recipe).map_err(|e| AiError::InvalidRecipe(e.to_string()))?;
                Ok(recipe)
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

fn recipe_for(request: &GenerationRequest) -> RecipeSchema {
    let title: String = format!("{TITLE_PREFIX}{}", request.prompt.trim())
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();

    let (prep, cook) = match request.max_total_time_minutes {
        Some(limit) if limit < DEFAULT_PREP + DEFAULT_COOK => {
            let prep = limit / 3;
            (prep, limit - prep)
        }
        _ => (DEFAULT_PREP, DEFAULT_COOK),
    };

    let disliked = &request.preferences.disliked_ingredients;
    let ingredients = PANTRY
        .into_iter()
        .filter(|name| !disliked.iter().any(|d| d.trim().eq_ignore_ascii_case(name)))
        .take(INGREDIENT_COUNT)
        .map(|name| RecipeIngredient {
            name: name.to_string(),
            quantity: Some("1".into()),
            unit: None,
        })
        .collect();

    let mut tags = vec!["quick".to_string()];
    if let Some(diet) = request.preferences.diet_type {
        tags.push(diet.as_str().replace('_', "-"));
    }

    RecipeSchema {
        title,
        description: Some("A simple dish made from pantry staples.".into()),
        prep_time_minutes: prep,
        cook_time_minutes: cook,
        servings: request.servings.unwrap_or(DEFAULT_SERVINGS),
        ingredients,
        instructions: vec![
            "Prepare the ingredients.".into(),
            "Cook everything together until done.".into(),
            "Season to taste and serve.".into(),
        ],
        nutrition: Some(Nutrition {
            calories: 420.0,
            protein_g: 12.0,
            carbs_g: 60.0,
            fat_g: 14.0,
        }),
        tags,
    }
}
