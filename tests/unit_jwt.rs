mod common;

use axum::http::StatusCode;
use common::{TestApp, first_detail};
use mydesk_auth::{create_access_token, verify_token};
use mydesk_config::JwtConfig;
use mydesk_core::ErrorKind;
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "test@example.com", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.email, "test@example.com");
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_verify_token_malformed() {
    let err = verify_token("not.a.token", &get_test_jwt_config()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new();
    let user = app.create_user().await;
    let forged = create_access_token(
        user.id().into_inner(),
        &user.user.email,
        &get_test_jwt_config(),
    )
    .unwrap();

    let (status, body) = app.get("/api/organizations", &forged).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(first_detail(&body), "Invalid or expired token");
}

#[tokio::test]
async fn test_authorization_without_bearer_scheme() {
    let app = TestApp::new();
    let user = app.create_user().await;

    let request = axum::http::Request::builder()
        .uri("/api/organizations")
        .header("authorization", user.token.clone())
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let app = TestApp::new();
    let user = app.create_user().await;

    let (status, body) = app.get("/api/organizations", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
