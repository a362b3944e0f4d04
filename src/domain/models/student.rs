use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Student {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(tenant_id: String, name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            name,
            email,
            created_at: Utc::now(),
        }
    }
}
