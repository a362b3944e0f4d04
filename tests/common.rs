use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use classbook_backend::{
    api::router::create_router,
    config::Config,
    domain::models::auth::{Claims, Role},
    domain::models::outbox::OutboxEvent,
    domain::ports::NotificationSink,
    domain::services::booking_engine::BookingEngine,
    error::AppError,
    infra::repositories::{
        sqlite_block_repo::SqliteBlockRepo, sqlite_booking_repo::SqliteBookingRepo,
        sqlite_class_repo::SqliteClassRepo, sqlite_class_type_repo::SqliteClassTypeRepo,
        sqlite_outbox_repo::SqliteOutboxRepo, sqlite_schedule_repo::SqliteScheduleRepo,
        sqlite_student_repo::SqliteStudentRepo, sqlite_tenant_repo::SqliteTenantRepo,
    },
    state::AppState,
};

pub struct MockNotificationSink;

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn dispatch(&self, _event: &OutboxEvent) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(false).await
    }

    pub async fn with_policy(allow_private_over_block: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_public_key: include_str!("keys/test_public.pem").to_string(),
            webhook_url: "http://localhost".to_string(),
            webhook_token: "token".to_string(),
            allow_private_over_block,
        };

        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let class_repo = Arc::new(SqliteClassRepo::new(pool.clone()));
        let booking_engine = Arc::new(BookingEngine::new(booking_repo.clone(), class_repo.clone()));

        let state = Arc::new(AppState {
            config,
            tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
            student_repo: Arc::new(SqliteStudentRepo::new(pool.clone())),
            class_type_repo: Arc::new(SqliteClassTypeRepo::new(pool.clone())),
            schedule_repo: Arc::new(SqliteScheduleRepo::new(pool.clone())),
            block_repo: Arc::new(SqliteBlockRepo::new(pool.clone())),
            class_repo,
            booking_repo,
            outbox_repo: Arc::new(SqliteOutboxRepo::new(pool.clone())),
            booking_engine,
            notification_sink: Arc::new(MockNotificationSink),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

fn mint_token(profile_id: &str, tenant_id: &str, role: Role) -> String {
    let claims = Claims {
        sub: profile_id.to_string(),
        tenant_id: tenant_id.to_string(),
        role,
        aud: "classbook".to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    let key = EncodingKey::from_ed_pem(include_str!("keys/test_private.pem").as_bytes())
        .expect("invalid test private key");
    encode(&Header::new(Algorithm::EdDSA), &claims, &key).expect("failed to sign test token")
}

#[allow(dead_code)]
pub fn teacher_token(tenant_id: &str) -> String {
    mint_token("teacher-1", tenant_id, Role::Teacher)
}

#[allow(dead_code)]
pub fn student_token(tenant_id: &str, student_id: &str) -> String {
    mint_token(student_id, tenant_id, Role::Student)
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn post_json(
    router: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn put_json(
    router: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn get(router: &Router, uri: &str, token: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn delete(router: &Router, uri: &str, token: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Creates a tenant and returns its id.
#[allow(dead_code)]
pub async fn create_tenant(app: &TestApp, slug: &str, auto_approve: bool) -> String {
    let res = post_json(
        &app.router,
        "/api/v1/tenants",
        None,
        serde_json::json!({
            "name": "Test Studio",
            "slug": slug,
            "timezone": "UTC",
            "auto_approve_bookings": auto_approve,
        }),
    )
    .await;
    assert_eq!(res.status(), 201, "tenant creation failed");
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_student(app: &TestApp, tenant_id: &str, name: &str) -> String {
    let token = teacher_token(tenant_id);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/students", tenant_id),
        Some(&token),
        serde_json::json!({ "name": name, "email": format!("{}@example.com", name) }),
    )
    .await;
    assert_eq!(res.status(), 201, "student creation failed");
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_class_type(app: &TestApp, tenant_id: &str, name: &str, max_students: i32) -> String {
    let token = teacher_token(tenant_id);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/class-types", tenant_id),
        Some(&token),
        serde_json::json!({ "name": name, "duration_min": 60, "max_students": max_students }),
    )
    .await;
    assert_eq!(res.status(), 201, "class type creation failed");
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_class(
    app: &TestApp,
    tenant_id: &str,
    class_type_id: &str,
    starts_at: &str,
    ends_at: &str,
    max_students: i32,
) -> String {
    let token = teacher_token(tenant_id);
    let res = post_json(
        &app.router,
        &format!("/api/v1/{}/classes", tenant_id),
        Some(&token),
        serde_json::json!({
            "class_type_id": class_type_id,
            "starts_at": starts_at,
            "ends_at": ends_at,
            "max_students": max_students,
        }),
    )
    .await;
    assert_eq!(res.status(), 201, "class creation failed");
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

/// Books `class_id` as `student_id` and returns the raw response.
#[allow(dead_code)]
pub async fn book(
    app: &TestApp,
    tenant_id: &str,
    class_id: &str,
    student_id: &str,
) -> axum::response::Response {
    let token = student_token(tenant_id, student_id);
    post_json(
        &app.router,
        &format!("/api/v1/{}/classes/{}/bookings", tenant_id, class_id),
        Some(&token),
        serde_json::json!({}),
    )
    .await
}
