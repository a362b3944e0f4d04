use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::block::Block;
use crate::domain::models::class::{Class, EventType};
use crate::domain::services::time_range::overlaps;

#[derive(Debug, Serialize, Clone)]
pub struct ConflictingEntity {
    pub id: String,
    pub kind: &'static str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone)]
pub struct Conflicts {
    pub classes: Vec<ConflictingEntity>,
    pub blocks: Vec<ConflictingEntity>,
}

impl Conflicts {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.blocks.is_empty()
    }

    pub fn entities(&self) -> Vec<ConflictingEntity> {
        self.classes.iter().chain(self.blocks.iter()).cloned().collect()
    }
}

/// Every non-cancelled class and every block whose interval overlaps the
/// candidate `[starts_at, ends_at)`, minus an optional excluded id (edit
/// scenarios). Cancelled classes no longer occupy the calendar.
pub fn find_conflicts(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    classes: &[Class],
    blocks: &[Block],
    exclude_id: Option<&str>,
) -> Conflicts {
    let mut conflicts = Conflicts::default();

    for class in classes {
        if class.is_cancelled || exclude_id == Some(class.id.as_str()) {
            continue;
        }
        if overlaps(starts_at, ends_at, class.starts_at, class.ends_at) {
            let kind = match class.event_type {
                EventType::Block => "block",
                EventType::Private => "private",
                EventType::Class => "class",
            };
            conflicts.classes.push(ConflictingEntity {
                id: class.id.clone(),
                kind,
                starts_at: class.starts_at,
                ends_at: class.ends_at,
            });
        }
    }

    for block in blocks {
        if exclude_id == Some(block.id.as_str()) {
            continue;
        }
        if overlaps(starts_at, ends_at, block.starts_at, block.ends_at) {
            conflicts.blocks.push(ConflictingEntity {
                id: block.id.clone(),
                kind: "block",
                starts_at: block.starts_at,
                ends_at: block.ends_at,
            });
        }
    }

    conflicts
}
