#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use mydesk::router::init_router;
use mydesk::state::AppState;
use mydesk_auth::create_access_token;
use mydesk_config::{AppConfig, JwtConfig};
use mydesk_db::{MemoryStore, UserRepository};
use mydesk_models::ids::UserId;
use mydesk_models::users::{NewUser, User};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> UserId {
        self.user.id
    }
}

/// The full router over an in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub jwt_config: JwtConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
            _ => None,
        });
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), &config);

        Self {
            router: init_router(state),
            store,
            jwt_config: config.jwt,
        }
    }

    pub async fn create_user(&self) -> TestUser {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let user = self
            .store
            .insert_user(NewUser {
                id: UserId::new(),
                email: generate_unique_email(),
                first_name,
                last_name,
            })
            .await
            .unwrap();
        let token = self.token_for(&user);

        TestUser { user, token }
    }

    pub fn token_for(&self, user: &User) -> String {
        create_access_token(user.id.into_inner(), &user.email, &self.jwt_config).unwrap()
    }

    /// A token for a user that exists only in the token.
    pub fn token_for_unknown_user(&self) -> String {
        create_access_token(Uuid::new_v4(), "ghost@test.com", &self.jwt_config).unwrap()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_string(&body).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("DELETE", uri, Some(token), Some(body)).await
    }

    /// Creates an organization owned by `owner` and returns its `org_id`.
    pub async fn create_organization(&self, owner: &TestUser) -> String {
        let org_id = generate_unique_org_id();
        let (status, _) = self
            .post(
                "/api/organizations",
                &owner.token,
                json!({ "org_id": org_id, "name": "Greenfield High" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        org_id
    }

    /// Creates a department in `org_id` and returns it as JSON.
    pub async fn create_department(&self, creator: &TestUser, org_id: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/departments",
                &creator.token,
                json!({ "org_id": org_id, "name": "Science" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    /// Makes `user` the owner of `dept_id` through a join request approved
    /// by the organization owner.
    pub async fn make_department_owner(
        &self,
        org_owner: &TestUser,
        user: &TestUser,
        org_id: &str,
        dept_id: &str,
    ) {
        if user.id() != org_owner.id() {
            let (status, body) = self
                .post(
                    "/api/departments/join",
                    &user.token,
                    json!({ "org_id": org_id, "dept_id": dept_id }),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
        }

        let (status, body) = self
            .post(
                "/api/departments/requests/approve",
                &org_owner.token,
                json!({ "org_id": org_id, "dept_id": dept_id, "user_id": user.id() }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    /// Creates a class through the API and returns its id.
    pub async fn create_class(
        &self,
        token: &str,
        org_id: &str,
        dept_id: &str,
        title: &str,
    ) -> i64 {
        let (status, body) = self
            .post(
                "/api/classes",
                token,
                json!({ "org_id": org_id, "dept_id": dept_id, "title": title }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["details"][0]["id"].as_i64().unwrap()
    }

    /// Creates a section through the API and returns its id.
    pub async fn create_section(
        &self,
        token: &str,
        org_id: &str,
        dept_id: &str,
        class_id: i64,
        title: &str,
    ) -> i64 {
        let (status, body) = self
            .post(
                "/api/sections",
                token,
                json!({
                    "org_id": org_id,
                    "dept_id": dept_id,
                    "class_id": class_id,
                    "title": title
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}

/// An organization with one department owned by a second user.
pub struct Campus {
    pub org_owner: TestUser,
    pub dept_owner: TestUser,
    pub org_id: String,
    pub dept_id: String,
}

impl Campus {
    pub async fn new(app: &TestApp) -> Self {
        let org_owner = app.create_user().await;
        let dept_owner = app.create_user().await;
        let org_id = app.create_organization(&org_owner).await;
        let department = app.create_department(&org_owner, &org_id).await;
        let dept_id = department["department_id"].as_str().unwrap().to_string();
        app.make_department_owner(&org_owner, &dept_owner, &org_id, &dept_id)
            .await;

        Self {
            org_owner,
            dept_owner,
            org_id,
            dept_id,
        }
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn generate_unique_org_id() -> String {
    format!("org-{}", Uuid::new_v4().simple())
}

pub fn first_detail(body: &Value) -> &str {
    body["details"][0].as_str().unwrap_or_default()
}
