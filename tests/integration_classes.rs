mod common;

use axum::http::StatusCode;
use common::{Campus, TestApp, first_detail};
use serde_json::json;

#[tokio::test]
async fn test_class_lifecycle() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    let create = json!({
        "org_id": campus.org_id,
        "dept_id": campus.dept_id,
        "title": "Grade 7"
    });

    let (status, body) = app
        .post("/api/classes", &campus.dept_owner.token, create.clone())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"][0]["title"], "Grade 7");
    assert_eq!(body["details"][0]["department_id"], campus.dept_id);
    let class_id = body["details"][0]["id"].as_i64().unwrap();

    let (status, body) = app
        .post("/api/classes", &campus.dept_owner.token, create.clone())
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(first_detail(&body), "Class already exists");

    let list_uri = format!("/api/classes?org_id={}", campus.org_id);
    let (status, body) = app.get(&list_uri, &campus.dept_owner.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .delete(
            "/api/classes",
            &campus.org_owner.token,
            json!({ "org_id": campus.org_id, "id": class_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first_detail(&body), "Successfully deleted class");

    let (_, body) = app.get(&list_uri, &campus.dept_owner.token).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = app
        .delete(
            "/api/classes",
            &campus.org_owner.token,
            json!({ "org_id": campus.org_id, "id": class_id }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_detail(&body), "invalid id");

    // a deleted title is free again
    let (status, _) = app
        .post("/api/classes", &campus.dept_owner.token, create)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_class_requires_title() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;

    let (status, body) = app
        .post(
            "/api/classes",
            &campus.dept_owner.token,
            json!({ "org_id": campus.org_id, "dept_id": campus.dept_id }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_detail(&body), "title is not passed");
}

#[tokio::test]
async fn test_org_owner_may_create_class() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;

    let id = app
        .create_class(
            &campus.org_owner.token,
            &campus.org_id,
            &campus.dept_id,
            "Grade 8",
        )
        .await;

    assert!(id > 0);
}

#[tokio::test]
async fn test_stranger_cannot_create_class() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    let stranger = app.create_user().await;

    let (status, _) = app
        .post(
            "/api/classes",
            &stranger.token,
            json!({ "org_id": campus.org_id, "dept_id": campus.dept_id, "title": "X" }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_other_organization_admin_is_forbidden() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    let rival = app.create_user().await;
    let rival_org = app.create_organization(&rival).await;

    // naming their own organization does not help
    let (status, body) = app
        .post(
            "/api/classes",
            &rival.token,
            json!({ "org_id": rival_org, "dept_id": campus.dept_id, "title": "X" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_detail(&body), "Invalid dept_id");

    let (status, _) = app
        .post(
            "/api/classes",
            &rival.token,
            json!({ "org_id": campus.org_id, "dept_id": campus.dept_id, "title": "X" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_classes_scoped_to_department() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    app.create_class(
        &campus.dept_owner.token,
        &campus.org_id,
        &campus.dept_id,
        "Grade 7",
    )
    .await;

    let (status, body) = app
        .get(
            &format!(
                "/api/classes?org_id={}&dept_id={}",
                campus.org_id, campus.dept_id
            ),
            &campus.org_owner.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .get(
            &format!("/api/classes?org_id={}&dept_id=unknown", campus.org_id),
            &campus.org_owner.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_member_cannot_list_classes() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    let stranger = app.create_user().await;

    let (status, _) = app
        .get(
            &format!("/api/classes?org_id={}", campus.org_id),
            &stranger.token,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rename_class() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    let grade_7 = app
        .create_class(
            &campus.dept_owner.token,
            &campus.org_id,
            &campus.dept_id,
            "Grade 7",
        )
        .await;
    app.create_class(
        &campus.dept_owner.token,
        &campus.org_id,
        &campus.dept_id,
        "Grade 8",
    )
    .await;

    let (status, body) = app
        .put(
            "/api/classes",
            &campus.org_owner.token,
            json!({ "org_id": campus.org_id, "id": grade_7, "title": "Grade 8" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(first_detail(&body), "Class already exists");

    let (status, body) = app
        .put(
            "/api/classes",
            &campus.org_owner.token,
            json!({ "org_id": campus.org_id, "id": grade_7, "title": "Year 7" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Year 7");

    let (status, body) = app
        .put(
            "/api/classes",
            &campus.org_owner.token,
            json!({ "org_id": campus.org_id, "id": 999_999, "title": "Ghost" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_detail(&body), "invalid id");
}
