use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveTime;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateScheduleRequest;
use crate::api::extractors::{auth::Auth, tenant::TenantId};
use crate::domain::models::schedule::{NewScheduleParams, Schedule};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }

    let start = NaiveTime::parse_from_str(&payload.start_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid start time format (HH:MM)".into()))?;
    let end = NaiveTime::parse_from_str(&payload.end_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid end time format (HH:MM)".into()))?;
    if start >= end {
        return Err(AppError::Validation("End time must be after start time".into()));
    }

    if let (Some(from), Some(until)) = (payload.valid_from, payload.valid_until) {
        if from > until {
            return Err(AppError::Validation("valid_from must not be after valid_until".into()));
        }
    }
    if payload.max_students.is_some_and(|m| m <= 0) {
        return Err(AppError::Validation("Capacity must be positive".into()));
    }

    state
        .class_type_repo
        .find_by_id(&tenant_id, &payload.class_type_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Class type not found".into()))?;

    let schedule = Schedule::new(NewScheduleParams {
        tenant_id,
        class_type_id: payload.class_type_id,
        day_of_week: payload.day_of_week,
        start_time: payload.start_time,
        end_time: payload.end_time,
        max_students: payload.max_students,
        valid_from: payload.valid_from,
        valid_until: payload.valid_until,
        is_public: payload.is_public.unwrap_or(true),
    });
    let created = state.schedule_repo.create(&schedule).await?;

    info!(schedule_id = %created.id, "Schedule created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    let schedules = state.schedule_repo.list_by_tenant(&tenant_id).await?;
    Ok(Json(schedules))
}

/// Schedules have no in-place edit: the update path is delete + recreate.
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, schedule_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    state.schedule_repo.delete(&tenant_id, &schedule_id).await?;
    info!(schedule_id = %schedule_id, "Schedule deleted");
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
