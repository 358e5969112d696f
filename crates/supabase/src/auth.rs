//! GoTrue endpoints.

use serde_json::json;

use crate::models::{AuthSession, SignUpResponse, SignUpResult, SupabaseUser};
use crate::{SupabaseClient, SupabaseError};

impl SupabaseClient {
    /// Exchange email + password for a session.
    ///
    /// `POST /auth/v1/token?grant_type=password`
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Register a new user.
    ///
    /// `POST /auth/v1/signup`. `email_redirect_to` is where the confirmation
    /// link lands.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: Option<&str>,
    ) -> Result<SignUpResult, SupabaseError> {
        let mut request = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }));
        if let Some(redirect) = email_redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }

        let response = request.send().await?;
        let body: SignUpResponse = Self::parse_response(response).await?;
        Ok(body.into())
    }

    /// Trade a refresh token for a new session.
    ///
    /// `POST /auth/v1/token?grant_type=refresh_token`
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, SupabaseError> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Resolve the user an access token belongs to.
    ///
    /// `GET /auth/v1/user`. Fails with a 401/403 API error when the token is
    /// expired or revoked.
    pub async fn get_user(&self, access_token: &str) -> Result<SupabaseUser, SupabaseError> {
        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Revoke the session behind `access_token`.
    ///
    /// `POST /auth/v1/logout`
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::check_status(response).await
    }
}
