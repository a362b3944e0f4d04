use crate::domain::models::class::Class;
use crate::domain::ports::ClassRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteClassRepo {
    pool: SqlitePool,
}

impl SqliteClassRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassRepository for SqliteClassRepo {
    async fn create(&self, class: &Class) -> Result<Class, AppError> {
        let created = sqlx::query_as::<_, Class>(
            "INSERT INTO classes (id, tenant_id, class_type_id, schedule_id, starts_at, ends_at,
                                  max_students, event_type, is_cancelled, cancelled_reason,
                                  is_recurring, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&class.id)
        .bind(&class.tenant_id)
        .bind(&class.class_type_id)
        .bind(&class.schedule_id)
        .bind(class.starts_at)
        .bind(class.ends_at)
        .bind(class.max_students)
        .bind(class.event_type)
        .bind(class.is_cancelled)
        .bind(&class.cancelled_reason)
        .bind(class.is_recurring)
        .bind(&class.notes)
        .bind(class.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Class>, AppError> {
        let class = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE tenant_id = ? AND id = ?",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class)
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Class>, AppError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE tenant_id = ? ORDER BY starts_at ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    async fn list_in_range(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Class>, AppError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT * FROM classes WHERE tenant_id = ? AND starts_at < ? AND ends_at > ? ORDER BY starts_at ASC",
        )
        .bind(tenant_id)
        .bind(end)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;
        Ok(classes)
    }

    async fn cancel(&self, tenant_id: &str, id: &str, reason: Option<String>) -> Result<Class, AppError> {
        let cancelled = sqlx::query_as::<_, Class>(
            "UPDATE classes SET is_cancelled = 1, cancelled_reason = ?
             WHERE tenant_id = ? AND id = ?
             RETURNING *",
        )
        .bind(reason)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".into()))?;
        Ok(cancelled)
    }
}
