use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

use crate::api::handlers::{
    availability, block, booking, class, class_type, health, schedule, student, tenant,
};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Tenant onboarding & public lookup
        .route("/api/v1/tenants", post(tenant::create_tenant))
        .route("/api/v1/tenants/by-slug/{slug}", get(tenant::get_tenant_by_slug))

        // Roster
        .route("/api/v1/{tenant_id}/students", post(student::create_student).get(student::list_students))
        .route("/api/v1/{tenant_id}/students/{student_id}", get(student::get_student))

        // Class types
        .route("/api/v1/{tenant_id}/class-types", post(class_type::create_class_type).get(class_type::list_class_types))
        .route("/api/v1/{tenant_id}/class-types/{class_type_id}", axum::routing::delete(class_type::delete_class_type))

        // Weekly schedules (create/delete only; edit = delete + recreate)
        .route("/api/v1/{tenant_id}/schedules", post(schedule::create_schedule).get(schedule::list_schedules))
        .route("/api/v1/{tenant_id}/schedules/{schedule_id}", axum::routing::delete(schedule::delete_schedule))

        // Blocks
        .route("/api/v1/{tenant_id}/blocks", post(block::create_block).get(block::list_blocks))
        .route("/api/v1/{tenant_id}/blocks/{block_id}", axum::routing::delete(block::delete_block))

        // Classes
        .route("/api/v1/{tenant_id}/classes", post(class::create_class).get(class::list_classes))
        .route("/api/v1/{tenant_id}/classes/{class_id}", get(class::get_class))
        .route("/api/v1/{tenant_id}/classes/{class_id}/cancel", post(class::cancel_class))

        // Public availability feed
        .route("/api/v1/{tenant_id}/availability", get(availability::get_availability_slots))

        // Bookings
        .route("/api/v1/{tenant_id}/classes/{class_id}/bookings", post(booking::create_booking).get(booking::list_class_bookings))
        .route("/api/v1/{tenant_id}/bookings/bulk", post(booking::create_bulk_booking))
        .route("/api/v1/{tenant_id}/bookings", get(booking::list_bookings))
        .route("/api/v1/{tenant_id}/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/{tenant_id}/bookings/{booking_id}/status", put(booking::update_booking_status))
        .route("/api/v1/{tenant_id}/bookings/{booking_id}/cancel", post(booking::cancel_booking))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        tenant_id = tracing::field::Empty,
                        actor_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
