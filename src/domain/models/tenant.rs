use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub slug: String,
    /// IANA timezone name, e.g. "Europe/Berlin". All local-time
    /// interpretation of this tenant's calendar goes through it.
    pub timezone: String,
    pub auto_approve_bookings: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(name: String, slug: String, timezone: String, auto_approve_bookings: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            timezone,
            auto_approve_bookings,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
