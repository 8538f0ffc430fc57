mod common;

use axum::http::StatusCode;
use common::{Campus, TestApp, TestUser, first_detail};
use serde_json::{Value, json};

async fn publish(app: &TestApp, author: &TestUser, body: Value) -> (StatusCode, Value) {
    app.post("/api/announcements", &author.token, body).await
}

#[tokio::test]
async fn test_title_and_user_type_required() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;

    let (status, body) = publish(
        &app,
        &campus.org_owner,
        json!({ "org_id": campus.org_id, "title": "Sports day" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_detail(&body), "title and user_type are required");
}

#[tokio::test]
async fn test_organization_announcement() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;

    let (status, body) = publish(
        &app,
        &campus.org_owner,
        json!({
            "org_id": campus.org_id,
            "title": "Sports day",
            "user_type": "org",
            "date": "2026-11-02"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let announcement = &body["details"][0];
    assert_eq!(announcement["origin"]["kind"], "organization");
    assert_eq!(announcement["visible"], true);
    assert_eq!(announcement["is_public"], false);
    assert_eq!(announcement["acknowledge"], false);
}

#[tokio::test]
async fn test_role_the_caller_does_not_hold() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;

    let (status, body) = publish(
        &app,
        &campus.dept_owner,
        json!({ "org_id": campus.org_id, "title": "Hi", "user_type": "org" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        first_detail(&body),
        "invalid user_type options are org,dept,teacher"
    );

    let (status, _) = publish(
        &app,
        &campus.org_owner,
        json!({ "org_id": campus.org_id, "title": "Hi", "user_type": "principal" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_department_announcement_needs_own_class() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    let class_id = app
        .create_class(
            &campus.dept_owner.token,
            &campus.org_id,
            &campus.dept_id,
            "Grade 7",
        )
        .await;

    let (status, body) = publish(
        &app,
        &campus.dept_owner,
        json!({
            "org_id": campus.org_id,
            "title": "Lab closed",
            "user_type": "dept",
            "from": class_id
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"][0]["origin"]["kind"], "department");
    assert_eq!(body["details"][0]["origin"]["class"], class_id);

    let (status, body) = publish(
        &app,
        &campus.dept_owner,
        json!({
            "org_id": campus.org_id,
            "title": "Lab closed",
            "user_type": "dept",
            "from": 999_999
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_detail(&body), "Department user is not valid");
}

#[tokio::test]
async fn test_teacher_announcement_through_own_subject() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    let teacher_user = app.create_user().await;
    let class_id = app
        .create_class(
            &campus.dept_owner.token,
            &campus.org_id,
            &campus.dept_id,
            "Grade 7",
        )
        .await;
    let section_id = app
        .create_section(
            &campus.dept_owner.token,
            &campus.org_id,
            &campus.dept_id,
            class_id,
            "A",
        )
        .await;
    let (_, teacher) = app
        .post(
            "/api/teachers",
            &campus.dept_owner.token,
            json!({
                "org_id": campus.org_id,
                "dept_id": campus.dept_id,
                "user_id": teacher_user.id()
            }),
        )
        .await;
    let (_, taught) = app
        .post(
            "/api/subjects",
            &campus.dept_owner.token,
            json!({
                "org_id": campus.org_id,
                "dept_id": campus.dept_id,
                "section_id": section_id,
                "title": "Biology",
                "teacher_id": teacher["id"]
            }),
        )
        .await;
    let (_, untaught) = app
        .post(
            "/api/subjects",
            &campus.dept_owner.token,
            json!({
                "org_id": campus.org_id,
                "dept_id": campus.dept_id,
                "section_id": section_id,
                "title": "Chemistry"
            }),
        )
        .await;

    let (status, body) = publish(
        &app,
        &teacher_user,
        json!({
            "org_id": campus.org_id,
            "title": "Homework",
            "user_type": "teacher",
            "from": taught["id"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"][0]["origin"]["kind"], "teacher");
    assert_eq!(body["details"][0]["origin"]["teacher"], teacher["id"]);

    let (status, body) = publish(
        &app,
        &teacher_user,
        json!({
            "org_id": campus.org_id,
            "title": "Homework",
            "user_type": "teacher",
            "from": untaught["id"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_detail(&body), "Teacher user is not valid");
}

#[tokio::test]
async fn test_only_author_edits_and_deletes() {
    let app = TestApp::new();
    let campus = Campus::new(&app).await;
    let (_, body) = publish(
        &app,
        &campus.org_owner,
        json!({ "org_id": campus.org_id, "title": "Sports day", "user_type": "org" }),
    )
    .await;
    let id = body["details"][0]["id"].clone();

    let (status, response) = app
        .put(
            "/api/announcements",
            &campus.dept_owner.token,
            json!({ "org_id": campus.org_id, "id": id, "title": "Cancelled" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_detail(&response), "invalid id");

    let (status, response) = app
        .put(
            "/api/announcements",
            &campus.org_owner.token,
            json!({ "org_id": campus.org_id, "id": id, "title": "Sports day moved", "is_public": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["details"][0]["title"], "Sports day moved");
    assert_eq!(response["details"][0]["is_public"], true);

    let (status, response) = app
        .delete(
            "/api/announcements",
            &campus.org_owner.token,
            json!({ "org_id": campus.org_id, "id": id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first_detail(&response), "Successfully deleted announcement");

    let (status, listed) = app
        .get(
            &format!("/api/announcements?org_id={}", campus.org_id),
            &campus.org_owner.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed["details"].as_array().unwrap().is_empty());
}
