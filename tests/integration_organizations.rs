mod common;

use axum::http::StatusCode;
use common::{TestApp, first_detail, generate_unique_org_id};
use serde_json::json;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();

    let (status, body) = app.request("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, body) = app
        .request("GET", "/api/organizations", None, None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(first_detail(&body), "Missing authorization header");
}

#[tokio::test]
async fn test_token_for_unknown_user_is_unauthorized() {
    let app = TestApp::new();
    let token = app.token_for_unknown_user();

    let (status, _) = app.get("/api/organizations", &token).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_organization() {
    let app = TestApp::new();
    let owner = app.create_user().await;
    let org_id = generate_unique_org_id();

    let (status, body) = app
        .post(
            "/api/organizations",
            &owner.token,
            json!({ "org_id": org_id, "name": "Greenfield High" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["org_id"], org_id);
    assert_eq!(body["owner_id"], owner.id().into_inner().to_string());
    assert_eq!(body["accepting_requests"], true);

    let (status, body) = app
        .get(&format!("/api/organizations?org_id={}", org_id), &owner.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Greenfield High");
}

#[tokio::test]
async fn test_duplicate_org_id_conflicts() {
    let app = TestApp::new();
    let owner = app.create_user().await;
    let other = app.create_user().await;
    let org_id = app.create_organization(&owner).await;

    let (status, body) = app
        .post(
            "/api/organizations",
            &other.token,
            json!({ "org_id": org_id, "name": "Copycat Academy" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(first_detail(&body), "org_id already exists");
}

#[tokio::test]
async fn test_create_rejects_empty_name() {
    let app = TestApp::new();
    let owner = app.create_user().await;

    let (status, _) = app
        .post(
            "/api/organizations",
            &owner.token,
            json!({ "org_id": generate_unique_org_id(), "name": "" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_owner_updates_organization() {
    let app = TestApp::new();
    let owner = app.create_user().await;
    let stranger = app.create_user().await;
    let org_id = app.create_organization(&owner).await;

    let (status, _) = app
        .put(
            "/api/organizations",
            &stranger.token,
            json!({ "org_id": org_id, "name": "Hijacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(
            "/api/organizations",
            &owner.token,
            json!({ "org_id": org_id, "name": "Renamed", "accepting_requests": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["accepting_requests"], false);
}

#[tokio::test]
async fn test_update_without_org_id_is_missing_parameter() {
    let app = TestApp::new();
    let owner = app.create_user().await;

    let (status, body) = app
        .put("/api/organizations", &owner.token, json!({ "name": "x" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_detail(&body), "org_id is not passed");
}

#[tokio::test]
async fn test_deleted_organization_disappears() {
    let app = TestApp::new();
    let owner = app.create_user().await;
    let org_id = app.create_organization(&owner).await;

    let (status, body) = app
        .delete("/api/organizations", &owner.token, json!({ "org_id": org_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first_detail(&body), "Successfully deleted organization");

    let (status, body) = app
        .get(&format!("/api/organizations?org_id={}", org_id), &owner.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = app
        .delete("/api/organizations", &owner.token, json!({ "org_id": org_id }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_detail(&body), "invalid id");
}

#[tokio::test]
async fn test_delete_unknown_or_foreign_organization() {
    let app = TestApp::new();
    let owner = app.create_user().await;
    let stranger = app.create_user().await;
    let org_id = app.create_organization(&owner).await;

    let (status, body) = app
        .delete(
            "/api/organizations",
            &owner.token,
            json!({ "org_id": "no-such-org" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_detail(&body), "invalid id");

    let (status, _) = app
        .delete("/api/organizations", &stranger.token, json!({ "org_id": org_id }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .get(&format!("/api/organizations?org_id={}", org_id), &owner.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}
