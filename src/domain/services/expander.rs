use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::domain::models::block::Block;
use crate::domain::models::class::{Class, EventType};
use crate::domain::models::class_type::ClassType;
use crate::domain::models::schedule::Schedule;
use crate::domain::services::time_range::overlaps;

/// A concrete calendar opening produced by expansion. Synthetic slots
/// (no `class_id`) come straight from a schedule template; materialized
/// slots carry the real class's times, capacity and cancellation state.
#[derive(Debug, Clone)]
pub struct Slot {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub class_type_id: String,
    pub class_type_name: String,
    pub schedule_id: Option<String>,
    pub class_id: Option<String>,
    pub max_students: i32,
    pub is_cancelled: bool,
    pub is_blocked: bool,
}

/// Expands all schedules over the inclusive `[from, to]` date window in
/// the tenant timezone, substituting materialized classes where they
/// exist and merging in directly-created classes. Blocks (and legacy
/// block-typed class rows) suppress synthetic candidates only; an
/// already-materialized class is governed by creation-time conflict
/// policy, not by expansion.
///
/// Pure and deterministic: same inputs, same slot list.
pub fn expand(
    tz: Tz,
    from: NaiveDate,
    to: NaiveDate,
    schedules: &[Schedule],
    class_types: &[ClassType],
    blocks: &[Block],
    classes: &[Class],
) -> Vec<Slot> {
    let types_by_id: HashMap<&str, &ClassType> =
        class_types.iter().map(|ct| (ct.id.as_str(), ct)).collect();

    // Schedule-to-class linkage, keyed by (schedule id, local date).
    let mut materialized: HashMap<(&str, NaiveDate), &Class> = HashMap::new();
    for class in classes {
        if let Some(sid) = &class.schedule_id {
            let local_date = class.starts_at.with_timezone(&tz).date_naive();
            materialized.insert((sid.as_str(), local_date), class);
        }
    }

    let blocked_ranges: Vec<(DateTime<Utc>, DateTime<Utc>)> = blocks
        .iter()
        .map(|b| (b.starts_at, b.ends_at))
        .chain(
            classes
                .iter()
                .filter(|c| c.event_type == EventType::Block && !c.is_cancelled)
                .map(|c| (c.starts_at, c.ends_at)),
        )
        .collect();

    let mut slots = Vec::new();
    let mut consumed: HashSet<&str> = HashSet::new();

    for schedule in schedules {
        if !schedule.is_active {
            continue;
        }
        if schedule.valid_from.is_some_and(|v| v > to)
            || schedule.valid_until.is_some_and(|v| v < from)
        {
            continue;
        }

        let Some(class_type) = types_by_id.get(schedule.class_type_id.as_str()) else {
            warn!(schedule_id = %schedule.id, "Skipping schedule with unknown class type");
            continue;
        };

        // Well-formedness was enforced at creation time; a violation here
        // is data corruption, so skip the row instead of aborting the
        // whole expansion.
        let (start_time, end_time) = match parse_window(&schedule.start_time, &schedule.end_time) {
            Some(window) => window,
            None => {
                warn!(schedule_id = %schedule.id, "Skipping schedule with malformed time window");
                continue;
            }
        };

        let weekday = schedule.day_of_week.to_weekday();
        let capacity = schedule.max_students.unwrap_or(class_type.max_students);

        let mut date = from;
        while date <= to {
            let matches_day = date.weekday() == weekday
                && !schedule.valid_from.is_some_and(|v| date < v)
                && !schedule.valid_until.is_some_and(|v| date > v);
            if !matches_day {
                match date.succ_opt() {
                    Some(next) => date = next,
                    None => break,
                }
                continue;
            }

            if let Some(class) = materialized.get(&(schedule.id.as_str(), date)) {
                consumed.insert(class.id.as_str());
                slots.push(slot_from_class(class, class_type.name.clone(), false));
            } else if let Some((slot_start, slot_end)) =
                resolve_local(tz, date, start_time, end_time)
            {
                let is_blocked = blocked_ranges
                    .iter()
                    .any(|(bs, be)| overlaps(slot_start, slot_end, *bs, *be));
                slots.push(Slot {
                    starts_at: slot_start,
                    ends_at: slot_end,
                    class_type_id: class_type.id.clone(),
                    class_type_name: class_type.name.clone(),
                    schedule_id: Some(schedule.id.clone()),
                    class_id: None,
                    max_students: capacity,
                    is_cancelled: false,
                    is_blocked,
                });
            } else {
                warn!(
                    schedule_id = %schedule.id,
                    date = %date,
                    "Local time unresolvable in tenant timezone (DST gap), slot skipped"
                );
            }

            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
    }

    // Directly-created classes (private sessions, overrides whose schedule
    // day fell outside the iteration) land in the calendar on their own.
    for class in classes {
        if class.event_type == EventType::Block || consumed.contains(class.id.as_str()) {
            continue;
        }
        let local_date = class.starts_at.with_timezone(&tz).date_naive();
        if local_date < from || local_date > to {
            continue;
        }
        let name = types_by_id
            .get(class.class_type_id.as_str())
            .map(|ct| ct.name.clone())
            .unwrap_or_default();
        slots.push(slot_from_class(class, name, false));
    }

    slots.sort_by(|a, b| {
        a.starts_at
            .cmp(&b.starts_at)
            .then_with(|| a.class_type_name.cmp(&b.class_type_name))
    });
    slots
}

fn slot_from_class(class: &Class, class_type_name: String, is_blocked: bool) -> Slot {
    Slot {
        starts_at: class.starts_at,
        ends_at: class.ends_at,
        class_type_id: class.class_type_id.clone(),
        class_type_name,
        schedule_id: class.schedule_id.clone(),
        class_id: Some(class.id.clone()),
        max_students: class.max_students,
        is_cancelled: class.is_cancelled,
        is_blocked,
    }
}

fn parse_window(start: &str, end: &str) -> Option<(NaiveTime, NaiveTime)> {
    let start = NaiveTime::parse_from_str(start, "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end, "%H:%M").ok()?;
    if start >= end {
        return None;
    }
    Some((start, end))
}

/// Resolves a local wall-clock window to UTC instants. `single()` keeps
/// 09:00 local at 09:00 local on both sides of a DST transition; a
/// nonexistent local time (spring-forward gap) yields `None`.
fn resolve_local(
    tz: Tz,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let slot_start = tz.from_local_datetime(&date.and_time(start)).single()?;
    let slot_end = tz.from_local_datetime(&date.and_time(end)).single()?;
    Some((slot_start.with_timezone(&Utc), slot_end.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::class::NewClassParams;
    use crate::domain::models::schedule::{DayOfWeek, NewScheduleParams};

    fn class_type(name: &str, max: i32) -> ClassType {
        ClassType::new("t1".into(), name.into(), 60, max, "#000".into(), true)
    }

    fn schedule(class_type_id: &str, day: DayOfWeek, start: &str, end: &str) -> Schedule {
        Schedule::new(NewScheduleParams {
            tenant_id: "t1".into(),
            class_type_id: class_type_id.into(),
            day_of_week: day,
            start_time: start.into(),
            end_time: end.into(),
            max_students: None,
            valid_from: None,
            valid_until: None,
            is_public: true,
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mondays_in_january_respect_valid_from() {
        let ct = class_type("Yoga", 8);
        let mut sched = schedule(&ct.id, DayOfWeek::Monday, "09:00", "10:00");
        sched.valid_from = Some(date(2026, 1, 1));

        let slots = expand(
            chrono_tz::UTC,
            date(2026, 1, 1),
            date(2026, 1, 31),
            &[sched],
            std::slice::from_ref(&ct),
            &[],
            &[],
        );

        // January 2026 Mondays: 5, 12, 19, 26.
        assert_eq!(slots.len(), 4);
        for slot in &slots {
            let local = slot.starts_at.date_naive();
            assert!(local >= date(2026, 1, 1));
            assert_eq!(slot.starts_at.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        }
    }

    #[test]
    fn valid_until_in_the_past_yields_nothing() {
        let ct = class_type("Yoga", 8);
        let mut sched = schedule(&ct.id, DayOfWeek::Monday, "09:00", "10:00");
        sched.valid_until = Some(date(2025, 12, 31));

        let slots = expand(
            chrono_tz::UTC,
            date(2026, 1, 1),
            date(2026, 1, 31),
            &[sched],
            std::slice::from_ref(&ct),
            &[],
            &[],
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn malformed_window_is_skipped_not_fatal() {
        let ct = class_type("Yoga", 8);
        let bad = schedule(&ct.id, DayOfWeek::Monday, "10:00", "09:00");
        let good = schedule(&ct.id, DayOfWeek::Tuesday, "09:00", "10:00");

        let slots = expand(
            chrono_tz::UTC,
            date(2026, 1, 5),
            date(2026, 1, 11),
            &[bad, good],
            std::slice::from_ref(&ct),
            &[],
            &[],
        );
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].starts_at.date_naive(), date(2026, 1, 6));
    }

    #[test]
    fn dst_transition_keeps_local_time() {
        let tz: Tz = "Europe/Berlin".parse().unwrap();
        let ct = class_type("Yoga", 8);
        let sched = schedule(&ct.id, DayOfWeek::Sunday, "09:00", "10:00");

        // Spring-forward in Europe/Berlin: 2026-03-29.
        let slots = expand(
            tz,
            date(2026, 3, 22),
            date(2026, 3, 29),
            &[sched],
            std::slice::from_ref(&ct),
            &[],
            &[],
        );
        assert_eq!(slots.len(), 2);
        // Both slots are 09:00 local but map to different UTC offsets:
        // CET (+1) before the transition, CEST (+2) after.
        assert_eq!(slots[0].starts_at.time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(slots[1].starts_at.time(), NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        for slot in &slots {
            let local = slot.starts_at.with_timezone(&tz);
            assert_eq!(local.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        }
    }

    #[test]
    fn block_marks_synthetic_slot_unavailable() {
        let ct = class_type("Yoga", 8);
        let sched = schedule(&ct.id, DayOfWeek::Monday, "09:00", "10:00");
        let block = Block::new(crate::domain::models::block::NewBlockParams {
            tenant_id: "t1".into(),
            starts_at: Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 1, 6, 0, 0, 0).unwrap(),
            title: Some("Vacation".into()),
            reason: None,
            is_recurring: false,
            recurrence_rule: None,
        });

        let slots = expand(
            chrono_tz::UTC,
            date(2026, 1, 5),
            date(2026, 1, 12),
            &[sched],
            std::slice::from_ref(&ct),
            &[block],
            &[],
        );
        assert_eq!(slots.len(), 2);
        assert!(slots[0].is_blocked);
        assert!(!slots[1].is_blocked);
    }

    #[test]
    fn materialized_class_replaces_synthetic_slot() {
        let ct = class_type("Yoga", 8);
        let sched = schedule(&ct.id, DayOfWeek::Monday, "09:00", "10:00");
        // Teacher moved the Jan 5 instance to 11:00 and shrank it.
        let class = Class::new(NewClassParams {
            tenant_id: "t1".into(),
            class_type_id: ct.id.clone(),
            schedule_id: Some(sched.id.clone()),
            starts_at: Utc.with_ymd_and_hms(2026, 1, 5, 11, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap(),
            max_students: 4,
            event_type: EventType::Class,
            is_recurring: true,
            notes: None,
        });

        let slots = expand(
            chrono_tz::UTC,
            date(2026, 1, 5),
            date(2026, 1, 5),
            &[sched],
            std::slice::from_ref(&ct),
            &[],
            std::slice::from_ref(&class),
        );
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].class_id.as_deref(), Some(class.id.as_str()));
        assert_eq!(slots[0].max_students, 4);
        assert_eq!(slots[0].starts_at, class.starts_at);
    }

    #[test]
    fn expansion_is_deterministic() {
        let ct_a = class_type("Aikido", 8);
        let ct_b = class_type("Ballet", 8);
        let schedules = vec![
            schedule(&ct_b.id, DayOfWeek::Monday, "09:00", "10:00"),
            schedule(&ct_a.id, DayOfWeek::Monday, "09:00", "10:00"),
        ];
        let types = vec![ct_a, ct_b];

        let run = || {
            expand(
                chrono_tz::UTC,
                date(2026, 1, 5),
                date(2026, 1, 5),
                &schedules,
                &types,
                &[],
                &[],
            )
        };
        let first = run();
        let second = run();
        assert_eq!(first.len(), 2);
        // Equal start instants tie-break on class type name.
        assert_eq!(first[0].class_type_name, "Aikido");
        assert_eq!(first[1].class_type_name, "Ballet");
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.starts_at, b.starts_at);
            assert_eq!(a.class_type_id, b.class_type_id);
        }
    }
}
