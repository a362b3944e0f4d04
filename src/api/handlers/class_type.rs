use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateClassTypeRequest;
use crate::api::extractors::{auth::Auth, tenant::TenantId};
use crate::domain::models::class_type::ClassType;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_class_type(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Json(payload): Json<CreateClassTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    if payload.duration_min <= 0 {
        return Err(AppError::Validation("Duration must be positive".into()));
    }
    if payload.max_students <= 0 {
        return Err(AppError::Validation("Capacity must be positive".into()));
    }

    let class_type = ClassType::new(
        tenant_id,
        payload.name,
        payload.duration_min,
        payload.max_students,
        payload.color.unwrap_or_else(|| "#4f46e5".to_string()),
        payload.is_public.unwrap_or(true),
    );
    let created = state.class_type_repo.create(&class_type).await?;

    info!(class_type_id = %created.id, "Class type created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_class_types(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
) -> Result<impl IntoResponse, AppError> {
    let class_types = state.class_type_repo.list_by_tenant(&tenant_id).await?;
    Ok(Json(class_types))
}

pub async fn delete_class_type(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, class_type_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    state.class_type_repo.delete(&tenant_id, &class_type_id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
