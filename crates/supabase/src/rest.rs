//! PostgREST access to the `profiles` and `recipes` tables.
//!
//! Every call carries the end user's access token, so Postgres row-level
//! security decides what is visible. Ownership filters (`user_id=eq.`) are
//! still sent explicitly to keep queries index-friendly.

use savor_core::cursor::DecodedCursor;
use savor_core::profile::{ProfileDto, UpdateProfileCommand};
use savor_core::recipe::{RecipeDto, RecipeSchema};
use savor_core::types::UserId;
use serde_json::json;
use uuid::Uuid;

use crate::{SupabaseClient, SupabaseError};

const PROFILES: &str = "profiles";
const RECIPES: &str = "recipes";

/// Keyset filter for rows strictly after `after` in
/// `created_at DESC, id DESC` order.
///
/// Values are double-quoted because timestamps contain PostgREST's reserved
/// `.` `:` and `,` characters.
pub fn keyset_filter(after: &DecodedCursor) -> String {
    format!(
        "(created_at.lt.\"{ts}\",and(created_at.eq.\"{ts}\",id.lt.\"{id}\"))",
        ts = after.created_at,
        id = after.id,
    )
}

impl SupabaseClient {
    fn rest_request(
        &self,
        method: reqwest::Method,
        table: &str,
        access_token: &str,
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    // ---- profiles ----

    /// Fetch the caller's profile. `None` when it has never been saved.
    pub async fn get_profile(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<Option<ProfileDto>, SupabaseError> {
        let response = self
            .rest_request(reqwest::Method::GET, PROFILES, access_token)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{user_id}"))])
            .send()
            .await?;

        let rows: Vec<ProfileDto> = Self::parse_response(response).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert or merge the caller's profile, writing only the fields present
    /// in `command`.
    pub async fn upsert_profile(
        &self,
        access_token: &str,
        user_id: UserId,
        command: &UpdateProfileCommand,
    ) -> Result<ProfileDto, SupabaseError> {
        let mut body = serde_json::to_value(command)
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("id".into(), json!(user_id));
        }

        let response = self
            .rest_request(reqwest::Method::POST, PROFILES, access_token)
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&body)
            .send()
            .await?;

        let rows: Vec<ProfileDto> = Self::parse_response(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SupabaseError::Decode("upsert returned no profile row".into()))
    }

    // ---- recipes ----

    /// List the caller's recipes newest first, starting after `after`.
    pub async fn list_recipes(
        &self,
        access_token: &str,
        user_id: UserId,
        limit: u32,
        after: Option<&DecodedCursor>,
    ) -> Result<Vec<RecipeDto>, SupabaseError> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("user_id", format!("eq.{user_id}")),
            ("order", "created_at.desc,id.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(after) = after {
            query.push(("or", keyset_filter(after)));
        }

        let response = self
            .rest_request(reqwest::Method::GET, RECIPES, access_token)
            .query(&query)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch one recipe by id. `None` when it does not exist or RLS hides it.
    pub async fn get_recipe(
        &self,
        access_token: &str,
        recipe_id: Uuid,
    ) -> Result<Option<RecipeDto>, SupabaseError> {
        let response = self
            .rest_request(reqwest::Method::GET, RECIPES, access_token)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{recipe_id}"))])
            .send()
            .await?;

        let rows: Vec<RecipeDto> = Self::parse_response(response).await?;
        Ok(rows.into_iter().next())
    }

    /// Store a recipe owned by `user_id`.
    pub async fn insert_recipe(
        &self,
        access_token: &str,
        user_id: UserId,
        recipe: &RecipeSchema,
    ) -> Result<RecipeDto, SupabaseError> {
        let body = json!({
            "user_id": user_id,
            "title": recipe.title,
            "recipe": recipe,
            "tags": recipe.tags,
        });

        let response = self
            .rest_request(reqwest::Method::POST, RECIPES, access_token)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        let rows: Vec<RecipeDto> = Self::parse_response(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SupabaseError::Decode("insert returned no recipe row".into()))
    }

    /// Delete a recipe. Returns `false` when no visible row matched.
    pub async fn delete_recipe(
        &self,
        access_token: &str,
        recipe_id: Uuid,
    ) -> Result<bool, SupabaseError> {
        let response = self
            .rest_request(reqwest::Method::DELETE, RECIPES, access_token)
            .query(&[("id", format!("eq.{recipe_id}"))])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let rows: Vec<serde_json::Value> = Self::parse_response(response).await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyset_filter_quotes_values() {
        let after = DecodedCursor {
            created_at: "2024-01-15T10:30:00.000Z".into(),
            id: "123e4567-e89b-12d3-a456-426614174000".into(),
        };
        assert_eq!(
            keyset_filter(&after),
            "(created_at.lt.\"2024-01-15T10:30:00.000Z\",and(created_at.eq.\"2024-01-15T10:30:00.000Z\",id.lt.\"123e4567-e89b-12d3-a456-426614174000\"))"
        );
    }
}
