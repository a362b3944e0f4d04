use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Transactional outbox row. Written in the same transaction as the
/// booking decision; the background worker owns delivery. A failed
/// dispatch never rolls back the booking it describes.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct OutboxEvent {
    pub id: String,
    pub tenant_id: String,
    pub event_type: String,
    pub payload: String,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OutboxEvent {
    pub fn new(tenant_id: String, event_type: &str, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            event_type: event_type.to_string(),
            payload: payload.to_string(),
            status: "pending".to_string(),
            error_message: None,
            created_at: Utc::now(),
        }
    }
}
