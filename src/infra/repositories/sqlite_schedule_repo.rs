use crate::domain::models::schedule::Schedule;
use crate::domain::ports::ScheduleRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteScheduleRepo {
    pool: SqlitePool,
}

impl SqliteScheduleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepo {
    async fn create(&self, schedule: &Schedule) -> Result<Schedule, AppError> {
        let created = sqlx::query_as::<_, Schedule>(
            "INSERT INTO schedules (id, tenant_id, class_type_id, day_of_week, start_time, end_time,
                                    max_students, valid_from, valid_until, is_public, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&schedule.id)
        .bind(&schedule.tenant_id)
        .bind(&schedule.class_type_id)
        .bind(schedule.day_of_week)
        .bind(&schedule.start_time)
        .bind(&schedule.end_time)
        .bind(schedule.max_students)
        .bind(schedule.valid_from)
        .bind(schedule.valid_until)
        .bind(schedule.is_public)
        .bind(schedule.is_active)
        .bind(schedule.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Schedule>, AppError> {
        let schedule = sqlx::query_as::<_, Schedule>(
            "SELECT * FROM schedules WHERE tenant_id = ? AND id = ?",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(schedule)
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Schedule>, AppError> {
        let schedules = sqlx::query_as::<_, Schedule>(
            "SELECT * FROM schedules WHERE tenant_id = ? ORDER BY created_at ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Schedule not found".into()));
        }
        Ok(())
    }
}
