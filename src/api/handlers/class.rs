use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CancelClassRequest, CreateClassRequest};
use crate::api::extractors::{auth::Auth, tenant::TenantId};
use crate::domain::models::class::{Class, EventType, NewClassParams};
use crate::domain::services::conflict::find_conflicts;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_class(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Json(payload): Json<CreateClassRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    if payload.starts_at >= payload.ends_at {
        return Err(AppError::Validation("Class end must be after start".into()));
    }

    let class_type = state
        .class_type_repo
        .find_by_id(&tenant_id, &payload.class_type_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Class type not found".into()))?;

    if let Some(schedule_id) = &payload.schedule_id {
        state
            .schedule_repo
            .find_by_id(&tenant_id, schedule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule not found".into()))?;
    }

    let event_type = payload.event_type.unwrap_or(EventType::Class);
    let max_students = payload.max_students.unwrap_or(class_type.max_students);
    if max_students <= 0 {
        return Err(AppError::Validation("Capacity must be positive".into()));
    }

    let existing_classes = state
        .class_repo
        .list_in_range(&tenant_id, payload.starts_at, payload.ends_at)
        .await?;
    let existing_blocks = state
        .block_repo
        .list_in_range(&tenant_id, payload.starts_at, payload.ends_at)
        .await?;

    let conflicts = find_conflicts(
        payload.starts_at,
        payload.ends_at,
        &existing_classes,
        &existing_blocks,
        None,
    );

    // Policy knob for private sessions over blocked time; a private
    // session never coexists with another class either way.
    let only_blocks = conflicts.classes.is_empty();
    let tolerated = event_type == EventType::Private
        && state.config.allow_private_over_block
        && only_blocks;

    if !conflicts.is_empty() && !tolerated {
        return Err(AppError::ConflictWithDetails {
            message: "Class overlaps existing calendar entries".into(),
            details: json!({ "conflicts": conflicts.entities() }),
        });
    }

    let class = Class::new(NewClassParams {
        tenant_id,
        class_type_id: payload.class_type_id,
        schedule_id: payload.schedule_id,
        starts_at: payload.starts_at,
        ends_at: payload.ends_at,
        max_students,
        event_type,
        is_recurring: payload.is_recurring.unwrap_or(false),
        notes: payload.notes,
    });
    let created = state.class_repo.create(&class).await?;

    info!(class_id = %created.id, "Class created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_classes(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    let classes = state.class_repo.list_by_tenant(&tenant_id).await?;
    Ok(Json(classes))
}

pub async fn get_class(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, class_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let class = state
        .class_repo
        .find_by_id(&tenant_id, &class_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".into()))?;
    Ok(Json(class))
}

/// Soft-cancel: the class stops accepting bookings but existing bookings
/// are retained, not voided. Notifying booked students is the
/// notification collaborator's job, via the outbox.
pub async fn cancel_class(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, class_id)): Path<(String, String)>,
    Json(payload): Json<CancelClassRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    let cancelled = state
        .class_repo
        .cancel(&tenant_id, &class_id, payload.reason)
        .await?;

    info!(class_id = %class_id, "Class cancelled");
    Ok(Json(cancelled))
}
