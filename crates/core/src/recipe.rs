//! Recipe schema, persisted recipe DTO, and generation request validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::normalize::{normalize_optional_text, normalize_tags};
use crate::types::{Timestamp, UserId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;
/// Upper bound for prep and cook time (one day).
const MAX_MINUTES: u32 = 1440;
const MAX_SERVINGS: u32 = 100;
const MAX_INGREDIENTS: usize = 100;
const MAX_INGREDIENT_NAME_LEN: usize = 200;
const MAX_STEPS: usize = 100;
const MAX_STEP_LEN: usize = 2000;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 50;

const MIN_PROMPT_LEN: usize = 3;
const MAX_PROMPT_LEN: usize = 500;
const MIN_TIME_LIMIT: u32 = 5;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// A single ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Per-serving nutrition estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// The full recipe document, as produced by the generator and stored in the
/// `recipes.recipe` jsonb column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSchema {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RecipeSchema {
    pub fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes.saturating_add(self.cook_time_minutes)
    }

    /// Trim free text and normalize tags. Validation runs on the result.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: normalize_optional_text(self.description),
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            servings: self.servings,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|i| RecipeIngredient {
                    name: i.name.trim().to_string(),
                    quantity: normalize_optional_text(i.quantity),
                    unit: normalize_optional_text(i.unit),
                })
                .collect(),
            instructions: self
                .instructions
                .into_iter()
                .map(|s| s.trim().to_string())
                .collect(),
            nutrition: self.nutrition,
            tags: normalize_tags(&self.tags),
        }
    }
}

/// A row of the `recipes` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDto {
    pub id: uuid::Uuid,
    pub user_id: UserId,
    pub title: String,
    pub recipe: RecipeSchema,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /api/recipes/generate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateRecipeCommand {
    pub prompt: String,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub max_total_time_minutes: Option<u32>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a recipe document. Call on a [`RecipeSchema::normalized`] value.
pub fn validate_recipe(recipe: &RecipeSchema) -> Result<(), CoreError> {
    let title_len = recipe.title.chars().count();
    if title_len == 0 || title_len > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be between 1 and {MAX_TITLE_LEN} characters"
        )));
    }
    if let Some(desc) = &recipe.description {
        if desc.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CoreError::Validation(format!(
                "Description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }
    }
    if recipe.prep_time_minutes > MAX_MINUTES || recipe.cook_time_minutes > MAX_MINUTES {
        return Err(CoreError::Validation(format!(
            "Prep and cook time must each be between 0 and {MAX_MINUTES} minutes"
        )));
    }
    validate_servings(recipe.servings)?;

    if recipe.ingredients.is_empty() || recipe.ingredients.len() > MAX_INGREDIENTS {
        return Err(CoreError::Validation(format!(
            "A recipe needs between 1 and {MAX_INGREDIENTS} ingredients"
        )));
    }
    for (i, ingredient) in recipe.ingredients.iter().enumerate() {
        let len = ingredient.name.trim().chars().count();
        if len == 0 || len > MAX_INGREDIENT_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "Ingredient at index {i} must have a name of 1 to {MAX_INGREDIENT_NAME_LEN} characters"
            )));
        }
    }

    if recipe.instructions.is_empty() || recipe.instructions.len() > MAX_STEPS {
        return Err(CoreError::Validation(format!(
            "A recipe needs between 1 and {MAX_STEPS} instruction steps"
        )));
    }
    for (i, step) in recipe.instructions.iter().enumerate() {
        let len = step.trim().chars().count();
        if len == 0 || len > MAX_STEP_LEN {
            return Err(CoreError::Validation(format!(
                "Instruction step at index {i} must be 1 to {MAX_STEP_LEN} characters"
            )));
        }
    }

    if let Some(n) = &recipe.nutrition {
        let values = [n.calories, n.protein_g, n.carbs_g, n.fat_g];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(CoreError::Validation(
                "Nutrition values must be non-negative numbers".into(),
            ));
        }
    }

    validate_tags(&recipe.tags)
}

/// Validate an already-normalized tag list.
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "A recipe may have at most {MAX_TAGS} tags"
        )));
    }
    if let Some(tag) = tags.iter().find(|t| t.chars().count() > MAX_TAG_LEN) {
        return Err(CoreError::Validation(format!(
            "Tag \"{tag}\" exceeds {MAX_TAG_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a generation request.
pub fn validate_generate_recipe(command: &GenerateRecipeCommand) -> Result<(), CoreError> {
    let len = command.prompt.trim().chars().count();
    if !(MIN_PROMPT_LEN..=MAX_PROMPT_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Prompt must be between {MIN_PROMPT_LEN} and {MAX_PROMPT_LEN} characters"
        )));
    }
    if let Some(servings) = command.servings {
        validate_servings(servings)?;
    }
    if let Some(limit) = command.max_total_time_minutes {
        if !(MIN_TIME_LIMIT..=MAX_MINUTES).contains(&limit) {
            return Err(CoreError::Validation(format!(
                "Maximum total time must be between {MIN_TIME_LIMIT} and {MAX_MINUTES} minutes"
            )));
        }
    }
    Ok(())
}

fn validate_servings(servings: u32) -> Result<(), CoreError> {
    if servings == 0 || servings > MAX_SERVINGS {
        return Err(CoreError::Validation(format!(
            "Servings must be between 1 and {MAX_SERVINGS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample_recipe() -> RecipeSchema {
        RecipeSchema {
            title: "Chickpea Curry".into(),
            description: Some("A weeknight curry.".into()),
            prep_time_minutes: 10,
            cook_time_minutes: 25,
            servings: 4,
            ingredients: vec![
                RecipeIngredient {
                    name: "chickpeas".into(),
                    quantity: Some("2".into()),
                    unit: Some("cans".into()),
                },
                RecipeIngredient {
                    name: "coconut milk".into(),
                    quantity: Some("400".into()),
                    unit: Some("ml".into()),
                },
            ],
            instructions: vec!["Simmer everything.".into(), "Serve with rice.".into()],
            nutrition: Some(Nutrition {
                calories: 420.0,
                protein_g: 14.0,
                carbs_g: 48.0,
                fat_g: 18.0,
            }),
            tags: vec!["vegan".into(), "curry".into()],
        }
    }

    #[test]
    fn valid_recipe_passes() {
        assert!(validate_recipe(&sample_recipe()).is_ok());
        assert_eq!(sample_recipe().total_time_minutes(), 35);
    }

    #[test]
    fn blank_title_fails_after_normalization() {
        let recipe = RecipeSchema {
            title: "   ".into(),
            ..sample_recipe()
        }
        .normalized();
        assert_matches!(validate_recipe(&recipe), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_ingredients_or_steps_fail() {
        let no_ingredients = RecipeSchema {
            ingredients: vec![],
            ..sample_recipe()
        };
        assert_matches!(validate_recipe(&no_ingredients), Err(CoreError::Validation(_)));

        let no_steps = RecipeSchema {
            instructions: vec![],
            ..sample_recipe()
        };
        assert_matches!(validate_recipe(&no_steps), Err(CoreError::Validation(_)));
    }

    #[test]
    fn out_of_range_timing_and_servings_fail() {
        let slow = RecipeSchema {
            cook_time_minutes: MAX_MINUTES + 1,
            ..sample_recipe()
        };
        assert!(validate_recipe(&slow).is_err());

        let nobody = RecipeSchema {
            servings: 0,
            ..sample_recipe()
        };
        assert!(validate_recipe(&nobody).is_err());
    }

    #[test]
    fn negative_nutrition_fails() {
        let recipe = RecipeSchema {
            nutrition: Some(Nutrition {
                calories: -1.0,
                protein_g: 0.0,
                carbs_g: 0.0,
                fat_g: 0.0,
            }),
            ..sample_recipe()
        };
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn normalization_cleans_tags_and_optional_text() {
        let recipe = RecipeSchema {
            description: Some("  ".into()),
            tags: vec!["Vegan".into(), " vegan ".into(), "One  Pot".into()],
            ..sample_recipe()
        }
        .normalized();
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.tags, vec!["vegan", "one pot"]);
    }

    #[test]
    fn too_many_tags_fail() {
        let tags: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&tags).is_err());
    }

    #[test]
    fn generate_command_bounds() {
        let ok = GenerateRecipeCommand {
            prompt: "something with lentils".into(),
            servings: Some(2),
            max_total_time_minutes: Some(30),
        };
        assert!(validate_generate_recipe(&ok).is_ok());

        let short = GenerateRecipeCommand {
            prompt: " a ".into(),
            ..ok.clone()
        };
        assert!(validate_generate_recipe(&short).is_err());

        let rushed = GenerateRecipeCommand {
            max_total_time_minutes: Some(1),
            ..ok
        };
        assert!(validate_generate_recipe(&rushed).is_err());
    }
}
