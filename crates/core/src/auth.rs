//! Credential request bodies and Supabase auth error translation.
//!
//! Authentication itself is Supabase's job. This module only checks request
//! shape before anything leaves the server, and turns Supabase's error
//! strings into messages fit for the login and registration forms.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::UserId;

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginCommand {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of `POST /api/auth/register`.
///
/// Supabase hashes with bcrypt, which ignores input past 72 bytes, so the
/// password is capped at 72 characters and at 72 bytes of UTF-8.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterCommand {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(
        length(
            min = 8,
            max = 72,
            message = "Password must be between 8 and 72 characters"
        ),
        custom(function = "validate_password")
    )]
    pub password: String,
}

impl LoginCommand {
    pub fn trimmed(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

impl RegisterCommand {
    pub fn trimmed(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

const MAX_PASSWORD_BYTES: usize = 72;

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_bytes");
        err.message = Some(Cow::Borrowed(
            "Password is too long; use fewer or simpler characters",
        ));
        return Err(err);
    }

    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_letter && has_digit {
        return Ok(());
    }
    let mut err = ValidationError::new("password_complexity");
    err.message = Some(Cow::Borrowed(
        "Password must contain at least one letter and one number",
    ));
    Err(err)
}

/// The user shape returned by every auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUserDto {
    pub id: UserId,
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Error translation
// ---------------------------------------------------------------------------

/// Broad category of a Supabase auth failure; decides the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    InvalidCredentials,
    EmailNotConfirmed,
    UserAlreadyExists,
    WeakPassword,
    RateLimited,
    Other,
}

/// A classified auth failure with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub kind: AuthFailureKind,
    pub message: String,
}

/// Classify a raw Supabase auth error message.
///
/// Matching is case-insensitive on known fragments; anything unrecognized is
/// [`AuthFailureKind::Other`] with a generic message so internal details do
/// not leak.
pub fn classify_auth_error(raw: &str) -> AuthFailure {
    let lower = raw.to_lowercase();

    let (kind, message) = if lower.contains("invalid login credentials")
        || lower.contains("invalid_credentials")
        || lower.contains("invalid_grant")
    {
        (AuthFailureKind::InvalidCredentials, "Invalid email or password")
    } else if lower.contains("email not confirmed") || lower.contains("email_not_confirmed") {
        (
            AuthFailureKind::EmailNotConfirmed,
            "Please confirm your email address before signing in",
        )
    } else if lower.contains("already registered") || lower.contains("user_already_exists") {
        (
            AuthFailureKind::UserAlreadyExists,
            "An account with this email already exists",
        )
    } else if lower.contains("password should") || lower.contains("weak_password") {
        (
            AuthFailureKind::WeakPassword,
            "Password does not meet the security requirements",
        )
    } else if lower.contains("rate limit") || lower.contains("too many") {
        (
            AuthFailureKind::RateLimited,
            "Too many attempts. Please try again later.",
        )
    } else {
        (
            AuthFailureKind::Other,
            "Authentication failed. Please try again.",
        )
    };

    AuthFailure {
        kind,
        message: message.to_string(),
    }
}

/// User-facing message for a raw Supabase auth error.
pub fn map_auth_error_message(raw: &str) -> String {
    classify_auth_error(raw).message
}
