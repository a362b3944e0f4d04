use crate::domain::models::class_type::ClassType;
use crate::domain::ports::ClassTypeRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteClassTypeRepo {
    pool: SqlitePool,
}

impl SqliteClassTypeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassTypeRepository for SqliteClassTypeRepo {
    async fn create(&self, class_type: &ClassType) -> Result<ClassType, AppError> {
        let created = sqlx::query_as::<_, ClassType>(
            "INSERT INTO class_types (id, tenant_id, name, duration_min, max_students, color, is_public, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&class_type.id)
        .bind(&class_type.tenant_id)
        .bind(&class_type.name)
        .bind(class_type.duration_min)
        .bind(class_type.max_students)
        .bind(&class_type.color)
        .bind(class_type.is_public)
        .bind(class_type.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<ClassType>, AppError> {
        let class_type = sqlx::query_as::<_, ClassType>(
            "SELECT * FROM class_types WHERE tenant_id = ? AND id = ?",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(class_type)
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<ClassType>, AppError> {
        let class_types = sqlx::query_as::<_, ClassType>(
            "SELECT * FROM class_types WHERE tenant_id = ? ORDER BY name ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(class_types)
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM class_types WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Class type not found".into()));
        }
        Ok(())
    }
}
