use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::models::booking::BookingStatus;
use crate::domain::models::class::EventType;
use crate::domain::models::schedule::DayOfWeek;

#[derive(Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub slug: String,
    pub timezone: Option<String>,
    pub auto_approve_bookings: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateClassTypeRequest {
    pub name: String,
    pub duration_min: i32,
    pub max_students: i32,
    pub color: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateScheduleRequest {
    pub class_type_id: String,
    pub day_of_week: DayOfWeek,
    /// "HH:MM" wall-clock in the tenant timezone.
    pub start_time: String,
    pub end_time: String,
    pub max_students: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateBlockRequest {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub title: Option<String>,
    pub reason: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_rule: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateClassRequest {
    pub class_type_id: String,
    pub schedule_id: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_students: Option<i32>,
    pub event_type: Option<EventType>,
    pub is_recurring: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelClassRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Defaults to the tenant's configured timezone.
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct BulkBookingRequest {
    pub class_ids: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}
