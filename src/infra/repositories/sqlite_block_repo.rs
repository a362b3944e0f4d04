use crate::domain::models::block::Block;
use crate::domain::ports::BlockRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteBlockRepo {
    pool: SqlitePool,
}

impl SqliteBlockRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockRepository for SqliteBlockRepo {
    async fn create(&self, block: &Block) -> Result<Block, AppError> {
        let created = sqlx::query_as::<_, Block>(
            "INSERT INTO blocks (id, tenant_id, starts_at, ends_at, title, reason, is_recurring, recurrence_rule, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&block.id)
        .bind(&block.tenant_id)
        .bind(block.starts_at)
        .bind(block.ends_at)
        .bind(&block.title)
        .bind(&block.reason)
        .bind(block.is_recurring)
        .bind(&block.recurrence_rule)
        .bind(block.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Block>, AppError> {
        let blocks = sqlx::query_as::<_, Block>(
            "SELECT * FROM blocks WHERE tenant_id = ? ORDER BY starts_at ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(blocks)
    }

    async fn list_in_range(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Block>, AppError> {
        let blocks = sqlx::query_as::<_, Block>(
            "SELECT * FROM blocks WHERE tenant_id = ? AND starts_at < ? AND ends_at > ? ORDER BY starts_at ASC",
        )
        .bind(tenant_id)
        .bind(end)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;
        Ok(blocks)
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blocks WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Block not found".into()));
        }
        Ok(())
    }
}
