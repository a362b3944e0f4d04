use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Regular group class, publicly visible.
    Class,
    /// One-on-one / private session.
    Private,
    /// Blocked time represented as a class row (legacy shape; new
    /// unavailability should be a `Block`).
    Block,
}

/// A concrete, bookable event. Either materialized from a `Schedule`
/// (`schedule_id` set) or created directly as an override or private
/// session. Cancellation is a terminal soft-delete: the class stops
/// accepting bookings but keeps its history.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Class {
    pub id: String,
    pub tenant_id: String,
    pub class_type_id: String,
    pub schedule_id: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_students: i32,
    pub event_type: EventType,
    pub is_cancelled: bool,
    pub cancelled_reason: Option<String>,
    pub is_recurring: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewClassParams {
    pub tenant_id: String,
    pub class_type_id: String,
    pub schedule_id: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_students: i32,
    pub event_type: EventType,
    pub is_recurring: bool,
    pub notes: Option<String>,
}

impl Class {
    pub fn new(params: NewClassParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: params.tenant_id,
            class_type_id: params.class_type_id,
            schedule_id: params.schedule_id,
            starts_at: params.starts_at,
            ends_at: params.ends_at,
            max_students: params.max_students,
            event_type: params.event_type,
            is_cancelled: false,
            cancelled_reason: None,
            is_recurring: params.is_recurring,
            notes: params.notes,
            created_at: Utc::now(),
        }
    }
}
