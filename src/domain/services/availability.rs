use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::services::expander::Slot;

/// One row of the public availability feed: an expanded slot overlaid
/// with live occupancy.
#[derive(Debug, Serialize, Clone)]
pub struct AvailabilitySlot {
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub class_type_id: String,
    pub class_type_name: String,
    /// Present when the slot is backed by a materialized class; synthetic
    /// slots have none and become bookable once the teacher materializes
    /// them.
    pub class_id: Option<String>,
    pub available_spots: i64,
    pub is_bookable: bool,
}

/// Overlays live booking counts onto expander output. Occupancy is keyed
/// by class id; synthetic slots have zero occupancy by construction.
/// Never cached: callers re-count on every projection.
pub fn project(
    slots: Vec<Slot>,
    occupancy: &HashMap<String, i64>,
    now: DateTime<Utc>,
) -> Vec<AvailabilitySlot> {
    slots
        .into_iter()
        .map(|slot| {
            let occupied = slot
                .class_id
                .as_ref()
                .and_then(|id| occupancy.get(id))
                .copied()
                .unwrap_or(0);
            let available_spots = (i64::from(slot.max_students) - occupied).max(0);
            let is_bookable = available_spots > 0
                && !slot.is_cancelled
                && !slot.is_blocked
                && slot.starts_at > now;

            AvailabilitySlot {
                slot_start: slot.starts_at,
                slot_end: slot.ends_at,
                class_type_id: slot.class_type_id,
                class_type_name: slot.class_type_name,
                class_id: slot.class_id,
                available_spots,
                is_bookable,
            }
        })
        .collect()
}
