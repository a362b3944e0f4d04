use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::dtos::requests::CreateStudentRequest;
use crate::api::extractors::{auth::Auth, tenant::TenantId};
use crate::domain::models::student::Student;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_student(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }

    let student = Student::new(tenant_id, payload.name, payload.email);
    let created = state.student_repo.create(&student).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_students(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) {
        return Err(AppError::Forbidden("Teacher role required".into()));
    }
    let students = state.student_repo.list_by_tenant(&tenant_id).await?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Auth(ctx): Auth,
    Path((_, student_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.can_manage(&tenant_id) && ctx.profile_id != student_id {
        return Err(AppError::Forbidden("Not allowed".into()));
    }
    let student = state
        .student_repo
        .find_by_id(&tenant_id, &student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".into()))?;
    Ok(Json(student))
}
