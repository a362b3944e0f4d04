use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateBlockRequest;
use crate::api::extractors::{auth::Auth, tenant::TenantId};
use crate::domain::models::block::{Block, NewBlockParams};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_block(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Json(payload): Json<CreateBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    if payload.starts_at >= payload.ends_at {
        return Err(AppError::Validation("Block end must be after start".into()));
    }

    // A block must not orphan students: any class in the window still
    // holding active bookings has to be resolved first. The blocking
    // bookings are returned so the teacher can cancel them deliberately.
    let blocking = state
        .booking_repo
        .find_active_in_range(&tenant_id, payload.starts_at, payload.ends_at)
        .await?;
    if !blocking.is_empty() {
        let details: Vec<_> = blocking
            .iter()
            .map(|b| {
                json!({
                    "booking_id": b.id,
                    "class_id": b.class_id,
                    "student_id": b.student_id,
                    "status": b.status,
                })
            })
            .collect();
        return Err(AppError::ConflictWithDetails {
            message: "Block window contains classes with active bookings".into(),
            details: json!({ "blocking_bookings": details }),
        });
    }

    let block = Block::new(NewBlockParams {
        tenant_id,
        starts_at: payload.starts_at,
        ends_at: payload.ends_at,
        title: payload.title,
        reason: payload.reason,
        is_recurring: payload.is_recurring.unwrap_or(false),
        recurrence_rule: payload.recurrence_rule,
    });
    let created = state.block_repo.create(&block).await?;

    info!(block_id = %created.id, "Block created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_blocks(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    let blocks = state.block_repo.list_by_tenant(&tenant_id).await?;
    Ok(Json(blocks))
}

pub async fn delete_block(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, block_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    state.block_repo.delete(&tenant_id, &block_id).await?;
    info!(block_id = %block_id, "Block deleted");
    Ok(Json(json!({ "status": "deleted" })))
}
