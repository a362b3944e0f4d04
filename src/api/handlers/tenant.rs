use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CreateTenantRequest;
use crate::domain::models::tenant::Tenant;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTenantRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Slug must not be empty".into()));
    }

    let timezone = payload.timezone.unwrap_or_else(|| "UTC".to_string());
    if timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation("Invalid timezone".into()));
    }

    if state.tenant_repo.find_by_slug(&payload.slug).await?.is_some() {
        return Err(AppError::Conflict("Slug already in use".into()));
    }

    let tenant = Tenant::new(
        payload.name,
        payload.slug,
        timezone,
        payload.auto_approve_bookings.unwrap_or(false),
    );
    let created = state.tenant_repo.create(&tenant).await?;

    info!(tenant_id = %created.id, slug = %created.slug, "Tenant created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_tenant_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = state
        .tenant_repo
        .find_by_slug(&slug)
        .await?
        .filter(|t| t.is_active)
        .ok_or_else(|| AppError::NotFound("Tenant not found".into()))?;
    Ok(Json(tenant))
}
