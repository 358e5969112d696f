//! HTTP-level integration tests for `/api/profile`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_auth, mock_expired_token, mock_valid_token, put_json_auth, ACCESS_TOKEN,
    USER_ID,
};
use serde_json::json;
use wiremock::matchers::{body_json as body_json_matcher, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn profile_row(diet_type: Option<&str>, disliked: &[&str]) -> serde_json::Value {
    json!({
        "id": USER_ID,
        "diet_type": diet_type,
        "disliked_ingredients": disliked,
        "preferred_cuisines": ["thai"],
        "created_at": "2024-01-10T08:00:00+00:00",
        "updated_at": "2024-01-12T08:00:00+00:00"
    })
}

#[tokio::test]
async fn get_profile_returns_saved_profile() {
    let app = common::build_test_app().await;
    mock_valid_token(&app.supabase, ACCESS_TOKEN).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", format!("eq.{USER_ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([profile_row(Some("vegan"), &["olives"])])),
        )
        .mount(&app.supabase)
        .await;

    let response = get_auth(app.app(), "/api/profile", ACCESS_TOKEN).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["diet_type"], "vegan");
    assert_eq!(json["data"]["disliked_ingredients"], json!(["olives"]));
}

#[tokio::test]
async fn get_profile_with_expired_bearer_token_returns_401() {
    let app = common::build_test_app().await;
    mock_expired_token(&app.supabase, "stale").await;

    let response = get_auth(app.app(), "/api/profile", "stale").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid or expired token");
}

#[tokio::test]
async fn update_profile_sends_normalized_partial_update() {
    let app = common::build_test_app().await;
    mock_valid_token(&app.supabase, ACCESS_TOKEN).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("on_conflict", "id"))
        .and(body_json_matcher(json!({
            "id": USER_ID,
            "disliked_ingredients": ["cilantro", "olives"]
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([profile_row(Some("vegan"), &["cilantro", "olives"])])),
        )
        .expect(1)
        .mount(&app.supabase)
        .await;

    let response = put_json_auth(
        app.app(),
        "/api/profile",
        ACCESS_TOKEN,
        json!({ "disliked_ingredients": [" Cilantro", "olives", "CILANTRO "] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["disliked_ingredients"], json!(["cilantro", "olives"]));
}

#[tokio::test]
async fn update_profile_can_clear_diet_type() {
    let app = common::build_test_app().await;
    mock_valid_token(&app.supabase, ACCESS_TOKEN).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .and(body_json_matcher(json!({ "id": USER_ID, "diet_type": null })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([profile_row(None, &[])])),
        )
        .expect(1)
        .mount(&app.supabase)
        .await;

    let response = put_json_auth(
        app.app(),
        "/api/profile",
        ACCESS_TOKEN,
        json!({ "diet_type": null }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["diet_type"].is_null());
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let app = common::build_test_app().await;
    mock_valid_token(&app.supabase, ACCESS_TOKEN).await;

    let response = put_json_auth(app.app(), "/api/profile", ACCESS_TOKEN, json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "At least one profile field must be provided");
}

#[tokio::test]
async fn unknown_diet_type_is_rejected() {
    let app = common::build_test_app().await;
    mock_valid_token(&app.supabase, ACCESS_TOKEN).await;

    let response = put_json_auth(
        app.app(),
        "/api/profile",
        ACCESS_TOKEN,
        json!({ "diet_type": "carnivore" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn rls_denial_maps_to_403() {
    let app = common::build_test_app().await;
    mock_valid_token(&app.supabase, ACCESS_TOKEN).await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/profiles"))
        .and(header("authorization", "Bearer access-abc"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "42501",
            "message": "new row violates row-level security policy for table \"profiles\""
        })))
        .mount(&app.supabase)
        .await;

    let response = put_json_auth(
        app.app(),
        "/api/profile",
        ACCESS_TOKEN,
        json!({ "preferred_cuisines": ["thai"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert!(!json["error"].as_str().unwrap().contains("row-level"));
}
