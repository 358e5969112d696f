#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use savor_ai::{AiConfig, FakeGenerator};
use savor_api::config::{ServerConfig, SupabaseSettings};
use savor_api::router::build_app_router;
use savor_api::state::AppState;
use savor_supabase::SupabaseClient;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER_ID: &str = "6f1c2d3e-4a5b-4c6d-8e7f-9a0b1c2d3e4f";
pub const USER_EMAIL: &str = "cook@example.com";
pub const ACCESS_TOKEN: &str = "access-abc";
pub const REFRESH_TOKEN: &str = "refresh-xyz";

/// Build a test `ServerConfig` pointing at the mock Supabase server.
pub fn test_config(supabase_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4321".to_string()],
        request_timeout_secs: 30,
        supabase: SupabaseSettings {
            url: supabase_url.to_string(),
            key: "anon-key".to_string(),
        },
        ai: AiConfig {
            provider: "fake".to_string(),
            model: None,
            api_key: None,
            base_url: None,
        },
        cookie_secure: false,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/public")),
        site_url: Some("http://localhost:4321".to_string()),
    }
}

/// The application under test plus the doubles behind it.
pub struct TestApp {
    pub router: Router,
    /// Stands in for the Supabase project (GoTrue + PostgREST).
    pub supabase: MockServer,
    pub generator: Arc<FakeGenerator>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router (same middleware stack as production)
/// against a fresh mock Supabase server and a recording [`FakeGenerator`].
pub async fn build_test_app() -> TestApp {
    build_test_app_with_generator(FakeGenerator::recording()).await
}

pub async fn build_test_app_with_generator(generator: FakeGenerator) -> TestApp {
    let supabase = MockServer::start().await;
    let config = test_config(&supabase.uri());
    let generator = Arc::new(generator);

    let state = AppState {
        config: Arc::new(config.clone()),
        supabase: SupabaseClient::new(supabase.uri(), "anon-key").unwrap(),
        generator: generator.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        supabase,
        generator,
    }
}

// ---------------------------------------------------------------------------
// Supabase fixtures
// ---------------------------------------------------------------------------

pub fn user_json() -> serde_json::Value {
    json!({
        "id": USER_ID,
        "email": USER_EMAIL,
        "email_confirmed_at": "2024-01-01T00:00:00Z"
    })
}

pub fn session_json(access_token: &str, refresh_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": 3600,
        "expires_at": 1_900_000_000,
        "token_type": "bearer",
        "user": user_json()
    })
}

/// Make `GET /auth/v1/user` accept `token`.
pub async fn mock_valid_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(server)
        .await;
}

/// Make `GET /auth/v1/user` reject `token` as expired.
pub async fn mock_expired_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "error_code": "bad_jwt",
            "msg": "invalid JWT: token is expired"
        })))
        .mount(server)
        .await;
}

pub fn recipe_row(id: &str, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": USER_ID,
        "title": "Chickpea Curry",
        "recipe": recipe_json(),
        "tags": ["vegan"],
        "created_at": created_at,
        "updated_at": created_at
    })
}

pub fn recipe_json() -> serde_json::Value {
    json!({
        "title": "Chickpea Curry",
        "prep_time_minutes": 10,
        "cook_time_minutes": 25,
        "servings": 4,
        "ingredients": [{ "name": "chickpeas", "quantity": "2", "unit": "cans" }],
        "instructions": ["Simmer everything."],
        "tags": ["vegan"]
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None, None).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::GET, uri, None, Some(cookie), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), None, Some(body)).await
}

pub async fn post_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::POST, uri, None, Some(cookie), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(token), None, Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None, None).await
}

/// Send a raw body with a JSON content type (for malformed-JSON tests).
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// The `Set-Cookie` value for cookie `name`, if any.
pub fn set_cookie(response: &Response, name: &str) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with(&format!("{name}=")))
}
