mod common;

use axum::http::StatusCode;
use common::{Campus, TestApp, TestUser, first_detail};
use serde_json::{Value, json};

struct Classroom {
    campus: Campus,
    section_id: i64,
}

async fn classroom(app: &TestApp) -> Classroom {
    let campus = Campus::new(app).await;
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

    Classroom { campus, section_id }
}

async fn join(app: &TestApp, student: &TestUser, org_id: &str, section_id: i64) -> (StatusCode, Value) {
    app.post(
        "/api/students/join",
        &student.token,
        json!({ "org_id": org_id, "sec_id": section_id }),
    )
    .await
}

async fn admit(app: &TestApp, room: &Classroom, students: Value) -> (StatusCode, Value) {
    app.post(
        "/api/departments/requests/student",
        &room.campus.dept_owner.token,
        json!({
            "org_id": room.campus.org_id,
            "dept_id": room.campus.dept_id,
            "students": students
        }),
    )
    .await
}

#[tokio::test]
async fn test_join_section_records_request() {
    let app = TestApp::new();
    let room = classroom(&app).await;
    let student = app.create_user().await;

    let (status, body) = join(&app, &student, &room.campus.org_id, room.section_id).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requested_section"], room.section_id);
    assert!(body["section"].is_null());
    assert_eq!(body["email"], student.user.email);

    let (status, body) = join(&app, &student, &room.campus.org_id, room.section_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(first_detail(&body), "Request already sent");
}

#[tokio::test]
async fn test_join_unknown_section() {
    let app = TestApp::new();
    let room = classroom(&app).await;
    let student = app.create_user().await;

    let (status, body) = join(&app, &student, &room.campus.org_id, 999_999).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_detail(&body), "invalid sec_id");
}

#[tokio::test]
async fn test_join_section_of_another_organization() {
    let app = TestApp::new();
    let room = classroom(&app).await;
    let other_owner = app.create_user().await;
    let other_org = app.create_organization(&other_owner).await;
    let student = app.create_user().await;

    let (status, body) = join(&app, &student, &other_org, room.section_id).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_detail(&body), "invalid sec_id");
}

#[tokio::test]
async fn test_join_refused_when_not_accepting_requests() {
    let app = TestApp::new();
    let room = classroom(&app).await;
    let student = app.create_user().await;
    app.put(
        "/api/organizations",
        &room.campus.org_owner.token,
        json!({ "org_id": room.campus.org_id, "accepting_requests": false }),
    )
    .await;

    let (status, body) = join(&app, &student, &room.campus.org_id, room.section_id).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        first_detail(&body),
        "This organization is not accepting requests currently."
    );
}

#[tokio::test]
async fn test_pending_students_for_department_owner() {
    let app = TestApp::new();
    let room = classroom(&app).await;
    let student = app.create_user().await;
    join(&app, &student, &room.campus.org_id, room.section_id).await;
    let uri = format!(
        "/api/departments/requests/student?dept_id={}&sec_id={}",
        room.campus.dept_id, room.section_id
    );

    let (status, body) = app.get(&uri, &room.campus.dept_owner.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["user_id"], student.id().into_inner().to_string());

    let (status, _) = app.get(&uri, &room.campus.org_owner.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_pending_students_empty_section() {
    let app = TestApp::new();
    let room = classroom(&app).await;

    let (status, body) = app
        .get(
            &format!(
                "/api/departments/requests/student?dept_id={}&sec_id={}",
                room.campus.dept_id, room.section_id
            ),
            &room.campus.dept_owner.token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        first_detail(&body),
        format!("no request pending for this section_id: {}", room.section_id)
    );
}

#[tokio::test]
async fn test_admit_students_flow() {
    let app = TestApp::new();
    let room = classroom(&app).await;
    let first = app.create_user().await;
    let second = app.create_user().await;
    let (_, a) = join(&app, &first, &room.campus.org_id, room.section_id).await;
    let (_, b) = join(&app, &second, &room.campus.org_id, room.section_id).await;

    let (status, body) = admit(&app, &room, json!([a["id"], b["id"]])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first_detail(&body),
        "Successfully accepted all provided requests."
    );

    let (status, body) = app
        .get(
            &format!(
                "/api/students?org_id={}&sec_id={}",
                room.campus.org_id, room.section_id
            ),
            &room.campus.dept_owner.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let admitted = body.as_array().unwrap();
    assert_eq!(admitted.len(), 2);
    assert!(admitted.iter().all(|s| s["section"] == room.section_id));
    assert!(admitted.iter().all(|s| s["requested_section"].is_null()));

    let (status, body) = admit(&app, &room, json!([a["id"]])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_detail(&body), "no students in waiting list");

    let (status, body) = join(&app, &first, &room.campus.org_id, room.section_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(first_detail(&body), "Already a student of this section");
}

#[tokio::test]
async fn test_admit_is_all_or_nothing() {
    let app = TestApp::new();
    let room = classroom(&app).await;
    let student = app.create_user().await;
    let (_, pending) = join(&app, &student, &room.campus.org_id, room.section_id).await;

    let (status, body) = admit(&app, &room, json!([pending["id"], 999_999])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_detail(&body), "Invalid student ID");

    let (_, body) = app
        .get(
            &format!(
                "/api/departments/requests/student?dept_id={}&sec_id={}",
                room.campus.dept_id, room.section_id
            ),
            &room.campus.dept_owner.token,
        )
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admit_rejects_malformed_list() {
    let app = TestApp::new();
    let room = classroom(&app).await;

    for students in [json!("[1, 2]"), json!([]), json!(["x"])] {
        let (status, _) = admit(&app, &room, students).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_delete_student() {
    let app = TestApp::new();
    let room = classroom(&app).await;
    let student = app.create_user().await;
    let (_, pending) = join(&app, &student, &room.campus.org_id, room.section_id).await;
    admit(&app, &room, json!([pending["id"]])).await;
    let body = json!({
        "org_id": room.campus.org_id,
        "dept_id": room.campus.dept_id,
        "id": pending["id"]
    });

    let (status, response) = app
        .delete("/api/students", &room.campus.dept_owner.token, body.clone())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first_detail(&response), "Successfully deleted student");

    let (status, _) = app
        .delete("/api/students", &room.campus.dept_owner.token, body)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app
        .get(
            &format!("/api/students?org_id={}", room.campus.org_id),
            &room.campus.org_owner.token,
        )
        .await;
    assert!(listed.as_array().unwrap().is_empty());
}
