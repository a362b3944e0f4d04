use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A bookable category (e.g. "Beginner Yoga", "1:1 Piano"). Editing a
/// class type does not retroactively resize classes already materialized
/// from it.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ClassType {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub duration_min: i32,
    pub max_students: i32,
    pub color: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl ClassType {
    pub fn new(
        tenant_id: String,
        name: String,
        duration_min: i32,
        max_students: i32,
        color: String,
        is_public: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            name,
            duration_min,
            max_students,
            color,
            is_public,
            created_at: Utc::now(),
        }
    }
}
