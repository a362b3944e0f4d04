use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn to_weekday(self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

/// A weekly recurrence template. Never directly bookable; the expander
/// turns it into concrete slots, and a materialized class linked via
/// `Class.schedule_id` takes precedence over the synthetic slot for its
/// date. The update path is delete + recreate, so rows are immutable
/// after creation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Schedule {
    pub id: String,
    pub tenant_id: String,
    pub class_type_id: String,
    pub day_of_week: DayOfWeek,
    /// "HH:MM" local wall-clock times in the tenant timezone.
    pub start_time: String,
    pub end_time: String,
    /// Overrides the class type capacity when set.
    pub max_students: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub is_public: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewScheduleParams {
    pub tenant_id: String,
    pub class_type_id: String,
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub max_students: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub is_public: bool,
}

impl Schedule {
    pub fn new(params: NewScheduleParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: params.tenant_id,
            class_type_id: params.class_type_id,
            day_of_week: params.day_of_week,
            start_time: params.start_time,
            end_time: params.end_time,
            max_students: params.max_students,
            valid_from: params.valid_from,
            valid_until: params.valid_until,
            is_public: params.is_public,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
