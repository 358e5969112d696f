//! Prompt construction and response parsing.

use savor_core::recipe::{validate_recipe, RecipeSchema};

use crate::{AiError, GenerationRequest};

/// System message sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are SavorAI, a culinary assistant. \
You write practical home-cooking recipes and always respect the user's dietary \
restrictions. You respond with a single JSON object and nothing else.";

/// JSON shape the model must return.
const RESPONSE_SHAPE: &str = r#"{
  "title": string,
  "description": string,
  "prep_time_minutes": integer,
  "cook_time_minutes": integer,
  "servings": integer,
  "ingredients": [{ "name": string, "quantity": string, "unit": string }],
  "instructions": [string],
  "nutrition": { "calories": number, "protein_g": number, "carbs_g": number, "fat_g": number },
  "tags": [string]
}"#;

/// Build the user message for a generation request.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!("Create a recipe for: {}\n", request.prompt.trim());

    if let Some(servings) = request.servings {
        prompt.push_str(&format!("Servings: {servings}\n"));
    }
    if let Some(minutes) = request.max_total_time_minutes {
        prompt.push_str(&format!(
            "Total time (prep + cook) must not exceed {minutes} minutes.\n"
        ));
    }

    let prefs = &request.preferences;
    if let Some(diet) = prefs.diet_type {
        prompt.push_str(&format!(
            "The recipe must be suitable for a {} diet.\n",
            diet.label()
        ));
    }
    if !prefs.disliked_ingredients.is_empty() {
        prompt.push_str(&format!(
            "Never use these ingredients: {}.\n",
            prefs.disliked_ingredients.join(", ")
        ));
    }
    if !prefs.preferred_cuisines.is_empty() {
        prompt.push_str(&format!(
            "Where it fits the request, lean towards these cuisines: {}.\n",
            prefs.preferred_cuisines.join(", ")
        ));
    }

    prompt.push_str("\nRespond with JSON matching exactly this shape:\n");
    prompt.push_str(RESPONSE_SHAPE);
    prompt
}

/// Parse model output into a validated, normalized recipe.
///
/// Accepts a bare JSON object or one wrapped in a Markdown code fence, and
/// tolerates prose around the object.
pub fn parse_recipe_response(text: &str) -> Result<RecipeSchema, AiError> {
    let json = extract_json_object(text)
        .ok_or_else(|| AiError::ParseError("No JSON object in response".into()))?;

    let recipe: RecipeSchema =
        serde_json::from_str(json).map_err(|e| AiError::ParseError(e.to_string()))?;
    let recipe = recipe.normalized();

    validate_recipe(&recipe).map_err(|e| AiError::InvalidRecipe(e.to_string()))?;
    Ok(recipe)
}

/// Slice from the first `{` to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use savor_core::profile::DietType;

    use super::*;
    use crate::DietaryPreferences;

    const VALID: &str = r#"{
        "title": "Lentil Soup",
        "description": "Hearty and quick.",
        "prep_time_minutes": 10,
        "cook_time_minutes": 30,
        "servings": 4,
        "ingredients": [{ "name": "red lentils", "quantity": "1", "unit": "cup" }],
        "instructions": ["Rinse lentils.", "Simmer 30 minutes."],
        "nutrition": { "calories": 310, "protein_g": 18, "carbs_g": 50, "fat_g": 4 },
        "tags": ["Soup", "soup", "Vegan"]
    }"#;

    #[test]
    fn prompt_includes_preferences() {
        let request = GenerationRequest {
            prompt: "  a cozy soup ".into(),
            servings: Some(2),
            max_total_time_minutes: Some(45),
            preferences: DietaryPreferences {
                diet_type: Some(DietType::GlutenFree),
                disliked_ingredients: vec!["cilantro".into(), "olives".into()],
                preferred_cuisines: vec!["thai".into()],
            },
        };
        let prompt = build_prompt(&request);
        assert!(prompt.starts_with("Create a recipe for: a cozy soup\n"));
        assert!(prompt.contains("Servings: 2"));
        assert!(prompt.contains("must not exceed 45 minutes"));
        assert!(prompt.contains("Gluten-free diet"));
        assert!(prompt.contains("Never use these ingredients: cilantro, olives."));
        assert!(prompt.contains("cuisines: thai."));
    }

    #[test]
    fn prompt_without_preferences_omits_constraint_lines() {
        let request = GenerationRequest {
            prompt: "pancakes".into(),
            ..Default::default()
        };
        let prompt = build_prompt(&request);
        assert!(!prompt.contains("Never use"));
        assert!(!prompt.contains("diet."));
        assert!(prompt.contains("\"instructions\""));
    }

    #[test]
    fn parses_bare_json_and_normalizes_tags() {
        let recipe = parse_recipe_response(VALID).unwrap();
        assert_eq!(recipe.title, "Lentil Soup");
        assert_eq!(recipe.tags, vec!["soup", "vegan"]);
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("Here you go!\n```json\n{VALID}\n```\nEnjoy.");
        assert!(parse_recipe_response(&fenced).is_ok());
    }

    #[test]
    fn rejects_non_json() {
        assert_matches!(
            parse_recipe_response("Sorry, I can't help with that."),
            Err(AiError::ParseError(_))
        );
    }

    #[test]
    fn rejects_schema_violations() {
        let no_steps = VALID.replace(
            r#"["Rinse lentils.", "Simmer 30 minutes."]"#,
            "[]",
        );
        assert_matches!(
            parse_recipe_response(&no_steps),
            Err(AiError::InvalidRecipe(_))
        );
    }
}
