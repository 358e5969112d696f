//! Shared response envelope types for API handlers.
//!
//! Resource endpoints answer with `{ "data": ... }`. The auth endpoints use
//! [`UserResponse`] and [`SuccessResponse`] instead, matching what the login
//! and registration forms read.

use savor_core::auth::AuthUserDto;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "user": { "id", "email" } }` returned by login and register.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: AuthUserDto,
}

/// `{ "success": true }`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
