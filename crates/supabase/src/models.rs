//! Wire types for GoTrue responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use savor_core::auth::AuthUserDto;

/// A GoTrue user. Only the fields SavorAI reads are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<SupabaseUser> for AuthUserDto {
    fn from(user: SupabaseUser) -> Self {
        AuthUserDto {
            id: user.id,
            email: user.email,
        }
    }
}

/// Tokens returned by a successful sign-in, refresh, or auto-confirmed sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SupabaseUser,
}

/// Outcome of `POST /auth/v1/signup`.
///
/// With email confirmation enabled GoTrue returns only the user; `session`
/// is then `None` and the user must confirm before signing in.
#[derive(Debug, Clone)]
pub struct SignUpResult {
    pub user: SupabaseUser,
    pub session: Option<AuthSession>,
}

/// Raw sign-up body: a full session, or a bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(AuthSession),
    User(SupabaseUser),
}

impl From<SignUpResponse> for SignUpResult {
    fn from(response: SignUpResponse) -> Self {
        match response {
            SignUpResponse::Session(session) => SignUpResult {
                user: session.user.clone(),
                session: Some(session),
            },
            SignUpResponse::User(user) => SignUpResult {
                user,
                session: None,
            },
        }
    }
}
