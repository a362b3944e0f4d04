use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::booking_engine::BookingEngine;
use crate::infra::notify::webhook_sink::WebhookSink;
use crate::infra::repositories::{
    sqlite_block_repo::SqliteBlockRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_class_repo::SqliteClassRepo, sqlite_class_type_repo::SqliteClassTypeRepo,
    sqlite_outbox_repo::SqliteOutboxRepo, sqlite_schedule_repo::SqliteScheduleRepo,
    sqlite_student_repo::SqliteStudentRepo, sqlite_tenant_repo::SqliteTenantRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
    let class_repo = Arc::new(SqliteClassRepo::new(pool.clone()));
    let booking_engine = Arc::new(BookingEngine::new(booking_repo.clone(), class_repo.clone()));

    let notification_sink = Arc::new(WebhookSink::new(
        config.webhook_url.clone(),
        config.webhook_token.clone(),
    ));

    AppState {
        config: config.clone(),
        tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
        student_repo: Arc::new(SqliteStudentRepo::new(pool.clone())),
        class_type_repo: Arc::new(SqliteClassTypeRepo::new(pool.clone())),
        schedule_repo: Arc::new(SqliteScheduleRepo::new(pool.clone())),
        block_repo: Arc::new(SqliteBlockRepo::new(pool.clone())),
        class_repo,
        booking_repo,
        outbox_repo: Arc::new(SqliteOutboxRepo::new(pool.clone())),
        booking_engine,
        notification_sink,
    }
}

async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
}
