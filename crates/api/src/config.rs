use std::path::PathBuf;

use savor_ai::AiConfig;

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development. `SUPABASE_URL` and `SUPABASE_KEY` have
/// no default and must be set.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub supabase: SupabaseSettings,
    pub ai: AiConfig,
    /// Mark session cookies `Secure` (default: `false`; enable behind HTTPS).
    pub cookie_secure: bool,
    /// Directory served for every non-API path (default: `public`).
    pub static_dir: PathBuf,
    /// Public origin of the site, used for the sign-up confirmation link.
    pub site_url: Option<String>,
}

/// Supabase project coordinates.
#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    pub url: String,
    /// Anon (publishable) key. Never the service-role key.
    pub key: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:4321`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SUPABASE_URL`         | required                   |
    /// | `SUPABASE_KEY`         | required                   |
    /// | `COOKIE_SECURE`        | `false`                    |
    /// | `STATIC_DIR`           | `public`                   |
    /// | `SITE_URL`             | unset                      |
    ///
    /// AI provider variables are read by [`AiConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:4321".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let supabase = SupabaseSettings {
            url: std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set"),
            key: std::env::var("SUPABASE_KEY").expect("SUPABASE_KEY must be set"),
        };

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);

        let static_dir = std::env::var("STATIC_DIR")
            .unwrap_or_else(|_| "public".into())
            .into();

        let site_url = std::env::var("SITE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            supabase,
            ai: AiConfig::from_env(),
            cookie_secure,
            static_dir,
            site_url,
        }
    }

    /// Where Supabase should send users after they click the confirmation
    /// link in the sign-up email.
    pub fn email_redirect_url(&self) -> Option<String> {
        self.site_url
            .as_ref()
            .map(|site| format!("{site}/auth/callback"))
    }
}
