use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dtos::requests::{
    BulkBookingRequest, CancelBookingRequest, CreateBookingRequest, UpdateBookingStatusRequest,
};
use crate::api::dtos::responses::{
    BookingCreatedResponse, BulkBookingResponse, StatusUpdateResponse,
};
use crate::api::extractors::{auth::Auth, tenant::TenantId};
use crate::domain::models::auth::{AuthContext, Role};
use crate::domain::models::booking::BookingStatus;
use crate::domain::models::tenant::Tenant;
use crate::error::AppError;
use crate::state::AppState;

async fn booking_student(
    state: &AppState,
    ctx: &AuthContext,
    tenant_id: &str,
) -> Result<Tenant, AppError> {
    if ctx.role != Role::Student {
        return Err(AppError::Forbidden("Student role required".into()));
    }
    if ctx.tenant_id != tenant_id {
        return Err(AppError::Forbidden("Token not valid for this tenant".into()));
    }
    state
        .student_repo
        .find_by_id(tenant_id, &ctx.profile_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Student not enrolled with this teacher".into()))?;
    state
        .tenant_repo
        .find_by_id(tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".into()))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, class_id)): Path<(String, String)>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = booking_student(&state, &ctx, &tenant_id).await?;

    let outcome = state
        .booking_engine
        .book_single(&tenant, &class_id, &ctx.profile_id, payload.notes, Utc::now())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            booking_id: outcome.booking.id,
            status: outcome.booking.status,
            available_spots: outcome.available_spots,
        }),
    ))
}

pub async fn create_bulk_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Json(payload): Json<BulkBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = booking_student(&state, &ctx, &tenant_id).await?;

    let bookings = state
        .booking_engine
        .book_bulk(
            &tenant,
            &payload.class_ids,
            &ctx.profile_id,
            payload.notes,
            Utc::now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BulkBookingResponse {
            booking_ids: bookings.into_iter().map(|b| b.id).collect(),
            status: BookingStatus::Pending,
        }),
    ))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, booking_id)): Path<(String, String)>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }

    let (old_status, updated) = state
        .booking_engine
        .update_status(&tenant_id, &booking_id, payload.status, payload.reason)
        .await?;

    Ok(Json(StatusUpdateResponse {
        old_status,
        new_status: updated.status,
    }))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, booking_id)): Path<(String, String)>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if ctx.role != Role::Student || ctx.tenant_id != tenant_id {
        return Err(AppError::Forbidden("Student role required".into()));
    }

    let cancelled = state
        .booking_engine
        .student_cancel(&tenant_id, &booking_id, &ctx.profile_id, payload.reason)
        .await?;

    Ok(Json(cancelled))
}

/// Per-class roster for the teacher, historical statuses included.
pub async fn list_class_bookings(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, class_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    let bookings = state.booking_repo.list_by_class(&tenant_id, &class_id).await?;
    Ok(Json(bookings))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    let bookings = state.booking_repo.list_by_tenant(&tenant_id).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&tenant_id, &booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

    if !ctx.can_manage(&tenant_id) && ctx.profile_id != booking.student_id {
        return Err(AppError::NotFound("Booking not found".into()));
    }
    Ok(Json(booking))
}
