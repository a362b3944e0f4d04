use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::api::dtos::requests::AvailabilityQuery;
use crate::api::extractors::tenant::TenantId;
use crate::domain::services::{availability::project, expander::expand};
use crate::error::AppError;
use crate::state::AppState;

/// Public availability feed: expanded schedule slots overlaid with live
/// occupancy. Occupancy is counted fresh on every request.
pub async fn get_availability_slots(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    if query.from > query.to {
        return Err(AppError::Validation("'from' must not be after 'to'".into()));
    }
    if query.to - query.from > Duration::days(366) {
        return Err(AppError::Validation("Window must not exceed one year".into()));
    }

    let tenant = state
        .tenant_repo
        .find_by_id(&tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".into()))?;

    let tz_name = query.timezone.unwrap_or(tenant.timezone);
    let tz: Tz = tz_name
        .parse()
        .map_err(|_| AppError::Validation("Invalid timezone".into()))?;

    // Load one day of slack either side so timezone offsets cannot push
    // window-edge entities out of the UTC query range; the expander
    // filters precisely by local date.
    let range_start = Utc
        .from_utc_datetime(&(query.from - Duration::days(1)).and_time(NaiveTime::MIN));
    let range_end = Utc
        .from_utc_datetime(&(query.to + Duration::days(2)).and_time(NaiveTime::MIN));

    let schedules = state.schedule_repo.list_by_tenant(&tenant_id).await?;
    let class_types = state.class_type_repo.list_by_tenant(&tenant_id).await?;
    let blocks = state
        .block_repo
        .list_in_range(&tenant_id, range_start, range_end)
        .await?;
    let classes = state
        .class_repo
        .list_in_range(&tenant_id, range_start, range_end)
        .await?;

    let slots = expand(
        tz,
        query.from,
        query.to,
        &schedules,
        &class_types,
        &blocks,
        &classes,
    );

    let class_ids: Vec<String> = classes.iter().map(|c| c.id.clone()).collect();
    let occupancy = state.booking_repo.count_active_for_classes(&class_ids).await?;

    let feed = project(slots, &occupancy, Utc::now());
    Ok(Json(feed))
}
