//! Handlers for the `/recipes` resource and AI generation.

use axum::extract::State;
use axum::http::StatusCode;
use chrono::SecondsFormat;
use savor_ai::{DietaryPreferences, GenerationRequest};
use savor_core::error::CoreError;
use savor_core::pagination::{Page, PageRequest};
use savor_core::recipe::{
    validate_generate_recipe, validate_recipe, GenerateRecipeCommand, RecipeDto, RecipeSchema,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::RecipeListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// `(created_at, id)` watermark of a row, as carried in the cursor.
///
/// Full sub-second precision so the keyset filter matches Postgres exactly.
fn watermark(recipe: &RecipeDto) -> (String, String) {
    (
        recipe
            .created_at
            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        recipe.id.to_string(),
    )
}

fn recipe_not_found(id: Uuid) -> CoreError {
    CoreError::NotFound {
        entity: "Recipe",
        id: id.to_string(),
    }
}

/// GET /api/recipes?limit=&cursor=
///
/// Newest first. Returns `{ data, next_cursor, has_more }`.
pub async fn list_recipes(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(params): AppQuery<RecipeListParams>,
) -> AppResult<AppJson<Page<RecipeDto>>> {
    let page = PageRequest::parse(params.limit, params.cursor.as_deref())?;

    let rows = state
        .supabase
        .list_recipes(
            &user.access_token,
            user.user_id,
            page.fetch_limit(),
            page.after.as_ref(),
        )
        .await?;

    Ok(AppJson(Page::from_overfetch(rows, page.limit, watermark)))
}

/// POST /api/recipes
///
/// Save a recipe (usually one just generated). Returns 201.
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<RecipeSchema>,
) -> AppResult<(StatusCode, AppJson<DataResponse<RecipeDto>>)> {
    let recipe = input.normalized();
    validate_recipe(&recipe)?;

    let saved = state
        .supabase
        .insert_recipe(&user.access_token, user.user_id, &recipe)
        .await?;

    tracing::info!(user_id = %user.user_id, recipe_id = %saved.id, "Recipe saved");
    Ok((StatusCode::CREATED, AppJson(DataResponse { data: saved })))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<AppJson<DataResponse<RecipeDto>>> {
    let recipe = state
        .supabase
        .get_recipe(&user.access_token, id)
        .await?
        .ok_or_else(|| recipe_not_found(id))?;
    Ok(AppJson(DataResponse { data: recipe }))
}

/// DELETE /api/recipes/{id}
///
/// 204 on success. Row-level security hides other users' recipes, so
/// deleting one of those is a 404 too.
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = state.supabase.delete_recipe(&user.access_token, id).await?;
    if !deleted {
        return Err(recipe_not_found(id).into());
    }
    tracing::info!(user_id = %user.user_id, recipe_id = %id, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/generate
///
/// Generate a recipe with the configured AI provider, constrained by the
/// caller's dietary profile. The result is returned, not saved.
pub async fn generate_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<GenerateRecipeCommand>,
) -> AppResult<AppJson<DataResponse<RecipeSchema>>> {
    validate_generate_recipe(&input)?;

    let profile = state
        .supabase
        .get_profile(&user.access_token, user.user_id)
        .await?;

    let request = GenerationRequest {
        prompt: input.prompt.trim().to_string(),
        servings: input.servings,
        max_total_time_minutes: input.max_total_time_minutes,
        preferences: profile
            .as_ref()
            .map(DietaryPreferences::from)
            .unwrap_or_default(),
    };

    tracing::info!(
        user_id = %user.user_id,
        provider = state.generator.provider_name(),
        model = state.generator.model_name(),
        "Generating recipe"
    );

    let recipe = state.generator.generate(&request).await?;

    if let Some(limit) = request.max_total_time_minutes {
        if recipe.total_time_minutes() > limit {
            tracing::warn!(
                limit,
                total = recipe.total_time_minutes(),
                "Generated recipe exceeds requested time limit"
            );
        }
    }

    Ok(AppJson(DataResponse { data: recipe }))
}
