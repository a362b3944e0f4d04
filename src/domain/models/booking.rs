use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingStatus {
    /// Pending and confirmed bookings hold a seat; everything else has
    /// released it.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Legal transitions of the booking state machine:
    ///
    /// ```text
    /// pending   -> confirmed | cancelled
    /// confirmed -> cancelled | completed | no_show
    /// cancelled, completed, no_show: terminal
    /// ```
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (Pending, Confirmed) | (Pending, Cancelled) => true,
            (Confirmed, Cancelled) | (Confirmed, Completed) | (Confirmed, NoShow) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::NoShow => "no_show",
        };
        f.write_str(s)
    }
}

/// A student's claim on a class seat. Never hard-deleted; cancellation
/// is a status change and the row stays for reporting.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub tenant_id: String,
    pub class_id: String,
    pub student_id: String,
    pub status: BookingStatus,
    pub attended: Option<bool>,
    pub notes: Option<String>,
    pub booked_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn new(
        tenant_id: String,
        class_id: String,
        student_id: String,
        status: BookingStatus,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            class_id,
            student_id,
            status,
            attended: None,
            notes,
            booked_at: Utc::now(),
            cancelled_at: None,
        }
    }
}
