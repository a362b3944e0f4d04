use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A teacher-declared unavailable window (vacation, personal time).
/// Creation is rejected while classes in the window still hold active
/// bookings, so a block never silently strands students.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Block {
    pub id: String,
    pub tenant_id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub title: Option<String>,
    pub reason: Option<String>,
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBlockParams {
    pub tenant_id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub title: Option<String>,
    pub reason: Option<String>,
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
}

impl Block {
    pub fn new(params: NewBlockParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: params.tenant_id,
            starts_at: params.starts_at,
            ends_at: params.ends_at,
            title: params.title,
            reason: params.reason,
            is_recurring: params.is_recurring,
            recurrence_rule: params.recurrence_rule,
            created_at: Utc::now(),
        }
    }
}
