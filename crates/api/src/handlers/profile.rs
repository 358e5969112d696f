//! Handlers for the caller's dietary profile.

use axum::extract::State;
use savor_core::profile::{validate_update_profile, ProfileDto, UpdateProfileCommand};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/profile
///
/// `data` is `null` until the user saves a profile for the first time.
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<AppJson<DataResponse<Option<ProfileDto>>>> {
    let profile = state
        .supabase
        .get_profile(&user.access_token, user.user_id)
        .await?;
    Ok(AppJson(DataResponse { data: profile }))
}

/// PUT /api/profile
///
/// Partial update: only fields present in the body are written. Creates the
/// profile row on first save.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<UpdateProfileCommand>,
) -> AppResult<AppJson<DataResponse<ProfileDto>>> {
    validate_update_profile(&input)?;
    let command = input.normalized();

    let profile = state
        .supabase
        .upsert_profile(&user.access_token, user.user_id, &command)
        .await?;

    tracing::info!(user_id = %user.user_id, "Profile updated");
    Ok(AppJson(DataResponse { data: profile }))
}
