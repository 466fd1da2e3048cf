#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use rollbook::router::init_router;
use rollbook::state::AppState;
use rollbook_auth::create_access_token;
use rollbook_config::JwtConfig;
use rollbook_core::hash_password;
use rollbook_models::UserRole;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl TestUser {
    /// Bearer token signed with the same configuration the app uses.
    pub fn token(&self) -> String {
        dotenvy::dotenv().ok();
        create_access_token(
            self.id,
            &self.email,
            self.role.as_str(),
            &JwtConfig::from_env(),
        )
        .unwrap()
    }
}

pub async fn create_test_user(pool: &PgPool, role: UserRole) -> TestUser {
    let email = generate_unique_email();
    let password = "testpass123".to_string();
    let hashed = hash_password(&password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (display_name, email, password, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(format!("Test {}", role.as_str()))
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email,
        password,
        role,
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    init_router(AppState::with_pool(pool), None)
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn student_payload(name: &str, class: &str, section: &str, roll_no: &str) -> Value {
    json!({
        "name": name,
        "class": class,
        "section": section,
        "roll_no": roll_no,
        "gender": "Female",
        "father_name": "John Doe",
        "mother_name": "Jane Doe",
        "contact_no": "555-0100",
        "email": format!("{}@school.test", name.to_lowercase().replace(' ', ".")),
        "address": "1 School Lane"
    })
}

/// Creates a student through the API and returns the `student` object.
pub async fn create_student(app: &Router, token: &str, payload: Value) -> Value {
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(request("POST", "/api/students", Some(token), Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    body_json(response).await["student"].clone()
}
