//! HTTP client for the two Supabase services SavorAI relies on.
//!
//! - [`auth`] -- GoTrue (`/auth/v1`): password sign-in, sign-up, token
//!   refresh, user lookup, sign-out.
//! - [`rest`] -- PostgREST (`/rest/v1`): the `profiles` and `recipes` tables,
//!   always called with the end user's access token so row-level security
//!   applies.

pub mod auth;
pub mod models;
pub mod rest;

use std::time::Duration;

use serde::Deserialize;

pub use models::{AuthSession, SignUpResult, SupabaseUser};

/// HTTP request timeout for a single Supabase call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from the Supabase client layer.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Supabase returned a non-2xx status code.
    #[error("Supabase API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code when Supabase provides one
        /// (`invalid_credentials`, `PGRST116`, ...).
        code: Option<String>,
        /// Human-readable message extracted from the error body.
        message: String,
    },

    /// A 2xx response whose body did not have the expected shape.
    #[error("Failed to decode Supabase response: {0}")]
    Decode(String),
}

impl SupabaseError {
    /// Status code of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401/403 responses (expired or revoked tokens, RLS denial).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

/// Union of the error body shapes GoTrue and PostgREST return.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
    code: Option<serde_json::Value>,
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        self.msg
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
    }

    fn code(&self) -> Option<String> {
        self.error_code
            .clone()
            .or_else(|| match &self.code {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                _ => None,
            })
            .or_else(|| self.error.clone())
    }
}

/// Client for one Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Create a client for the project at `url` using its anon (publishable) key.
    ///
    /// * `url` - Project URL, e.g. `https://abcd.supabase.co`.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, SupabaseError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, url, anon_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Project base URL (no trailing slash).
    pub fn url(&self) -> &str {
        &self.url
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. On failure, the body is
    /// parsed for a message and code.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SupabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body.message().unwrap_or(text);

        tracing::debug!(status = status.as_u16(), %message, "Supabase request failed");

        Err(SupabaseError::Api {
            status: status.as_u16(),
            code: body.code(),
            message,
        })
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SupabaseError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| SupabaseError::Decode(e.to_string()))
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), SupabaseError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_prefers_gotrue_msg() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("Invalid login credentials"));
        assert_eq!(body.code().as_deref(), Some("invalid_credentials"));
    }

    #[test]
    fn error_body_reads_legacy_oauth_shape() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("Invalid login credentials"));
        assert_eq!(body.code().as_deref(), Some("invalid_grant"));
    }

    #[test]
    fn error_body_reads_postgrest_shape() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"code":"42501","details":null,"hint":null,"message":"permission denied"}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("permission denied"));
        assert_eq!(body.code().as_deref(), Some("42501"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = SupabaseClient::with_client(
            reqwest::Client::new(),
            "https://example.supabase.co/",
            "anon",
        );
        assert_eq!(client.url(), "https://example.supabase.co");
        assert_eq!(
            client.auth_url("user"),
            "https://example.supabase.co/auth/v1/user"
        );
        assert_eq!(
            client.rest_url("profiles"),
            "https://example.supabase.co/rest/v1/profiles"
        );
    }

    #[test]
    fn auth_rejection_detection() {
        let err = SupabaseError::Api {
            status: 401,
            code: None,
            message: "JWT expired".into(),
        };
        assert!(err.is_auth_rejection());
        assert!(!SupabaseError::Decode("x".into()).is_auth_rejection());
    }
}
