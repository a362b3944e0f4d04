use serde::Serialize;

use crate::domain::models::booking::BookingStatus;

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking_id: String,
    pub status: BookingStatus,
    pub available_spots: i64,
}

#[derive(Serialize)]
pub struct BulkBookingResponse {
    pub booking_ids: Vec<String>,
    pub status: BookingStatus,
}

#[derive(Serialize)]
pub struct StatusUpdateResponse {
    pub old_status: BookingStatus,
    pub new_status: BookingStatus,
}
