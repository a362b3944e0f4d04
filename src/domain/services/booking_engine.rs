use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::models::class::Class;
use crate::domain::models::outbox::OutboxEvent;
use crate::domain::models::tenant::Tenant;
use crate::domain::ports::{BookingRepository, ClassRepository};
use crate::error::AppError;

/// Per-class async locks. The class is the concurrency unit: requests on
/// different classes never contend, requests on the same class serialize
/// around the occupancy check-and-insert.
pub struct ClassLocks {
    inner: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ClassLocks {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, class_id: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().expect("class lock map poisoned");
        map.entry(class_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for ClassLocks {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BookingOutcome {
    pub booking: Booking,
    pub available_spots: i64,
}

/// The transactional heart of the service. Guarantees that for any class
/// the number of pending+confirmed bookings never exceeds `max_students`,
/// no matter how many requests race for the last seat: the occupancy
/// re-count and the insert happen inside the per-class critical section
/// and a single database transaction.
pub struct BookingEngine {
    bookings: Arc<dyn BookingRepository>,
    classes: Arc<dyn ClassRepository>,
    locks: ClassLocks,
}

impl BookingEngine {
    pub fn new(bookings: Arc<dyn BookingRepository>, classes: Arc<dyn ClassRepository>) -> Self {
        Self {
            bookings,
            classes,
            locks: ClassLocks::new(),
        }
    }

    async fn load_bookable_class(
        &self,
        tenant_id: &str,
        class_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Class, AppError> {
        let class = self
            .classes
            .find_by_id(tenant_id, class_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".into()))?;

        if class.is_cancelled {
            return Err(AppError::Conflict("Class has been cancelled".into()));
        }
        if class.starts_at <= now {
            return Err(AppError::Validation(
                "Cannot book a class that has already started".into(),
            ));
        }
        Ok(class)
    }

    /// Reserves one seat. Status is `confirmed` for auto-approving
    /// tenants, `pending` otherwise. The duplicate-active guard makes
    /// retries after a timeout safe: a retried request either sees its own
    /// earlier success or proceeds cleanly.
    pub async fn book_single(
        &self,
        tenant: &Tenant,
        class_id: &str,
        student_id: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BookingOutcome, AppError> {
        let class = self.load_bookable_class(&tenant.id, class_id, now).await?;

        if self
            .bookings
            .find_active_by_student(class_id, student_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Student already has an active booking for this class".into(),
            ));
        }

        let status = if tenant.auto_approve_bookings {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        };
        let booking = Booking::new(
            tenant.id.clone(),
            class_id.to_string(),
            student_id.to_string(),
            status,
            notes,
        );
        let event = OutboxEvent::new(
            tenant.id.clone(),
            "booking.created",
            json!({
                "booking_id": booking.id,
                "class_id": class_id,
                "student_id": student_id,
                "status": status.to_string(),
            }),
        );

        let lock = self.locks.lock_for(class_id);
        let _guard = lock.lock().await;

        let occupancy = self
            .bookings
            .reserve(&booking, class.max_students, vec![event])
            .await?;

        info!(
            booking_id = %booking.id,
            class_id = %class_id,
            status = %status,
            "Booking reserved"
        );

        Ok(BookingOutcome {
            booking,
            available_spots: i64::from(class.max_students) - occupancy,
        })
    }

    /// Bulk reservation across several classes. Always produces `pending`
    /// bookings (bulk requests require human review) and is
    /// all-or-nothing: a failure on any class rolls back the whole batch
    /// and the per-class error list is returned to the caller.
    pub async fn book_bulk(
        &self,
        tenant: &Tenant,
        class_ids: &[String],
        student_id: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        if class_ids.len() < 2 {
            return Err(AppError::Validation(
                "Bulk booking requires at least two classes".into(),
            ));
        }

        let mut sorted_ids: Vec<&String> = class_ids.iter().collect();
        sorted_ids.sort();
        sorted_ids.dedup();
        if sorted_ids.len() != class_ids.len() {
            return Err(AppError::Validation(
                "Bulk booking contains duplicate class ids".into(),
            ));
        }

        // Locks are acquired in sorted id order so two overlapping bulk
        // requests cannot deadlock.
        let mut guards = Vec::with_capacity(sorted_ids.len());
        for id in &sorted_ids {
            let lock = self.locks.lock_for(id);
            guards.push(lock.lock_owned().await);
        }

        let mut errors = Vec::new();
        let mut capacities = HashMap::new();
        for id in &sorted_ids {
            match self.load_bookable_class(&tenant.id, id, now).await {
                Ok(class) => {
                    if self
                        .bookings
                        .find_active_by_student(id, student_id)
                        .await?
                        .is_some()
                    {
                        errors.push(json!({
                            "class_id": id,
                            "error": "Student already has an active booking for this class",
                        }));
                    } else {
                        capacities.insert((*id).clone(), class.max_students);
                    }
                }
                Err(AppError::Database(e)) => return Err(AppError::Database(e)),
                Err(e) => {
                    errors.push(json!({ "class_id": id, "error": e.to_string() }));
                }
            }
        }

        if !errors.is_empty() {
            return Err(AppError::ConflictWithDetails {
                message: "Bulk booking failed; no bookings were created".into(),
                details: json!({ "errors": errors }),
            });
        }

        let bookings: Vec<Booking> = sorted_ids
            .iter()
            .map(|id| {
                Booking::new(
                    tenant.id.clone(),
                    (*id).clone(),
                    student_id.to_string(),
                    BookingStatus::Pending,
                    notes.clone(),
                )
            })
            .collect();
        let events: Vec<OutboxEvent> = bookings
            .iter()
            .map(|b| {
                OutboxEvent::new(
                    tenant.id.clone(),
                    "booking.created",
                    json!({
                        "booking_id": b.id,
                        "class_id": b.class_id,
                        "student_id": student_id,
                        "status": "pending",
                    }),
                )
            })
            .collect();

        self.bookings.reserve_many(&bookings, &capacities, events).await?;

        info!(
            count = bookings.len(),
            student_id = %student_id,
            "Bulk booking reserved"
        );
        Ok(bookings)
    }

    /// Teacher-driven status transition. Approving `pending -> confirmed`
    /// re-validates capacity under the class lock so that approval can
    /// never overbook a class that filled up in the interim.
    pub async fn update_status(
        &self,
        tenant_id: &str,
        booking_id: &str,
        new_status: BookingStatus,
        reason: Option<String>,
    ) -> Result<(BookingStatus, Booking), AppError> {
        if new_status == BookingStatus::Pending {
            return Err(AppError::Validation(
                "Bookings cannot be moved back to pending".into(),
            ));
        }

        let booking = self
            .bookings
            .find_by_id(tenant_id, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;
        let old_status = booking.status;

        if !old_status.can_transition_to(new_status) {
            return Err(AppError::Conflict(format!(
                "Illegal status transition: {} -> {}",
                old_status, new_status
            )));
        }

        let lock = self.locks.lock_for(&booking.class_id);
        let _guard = lock.lock().await;

        if new_status == BookingStatus::Confirmed {
            let class = self
                .classes
                .find_by_id(tenant_id, &booking.class_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Class not found".into()))?;
            let others = self
                .bookings
                .count_active_excluding(&booking.class_id, booking_id)
                .await?;
            if others >= i64::from(class.max_students) {
                return Err(AppError::Conflict(
                    "Cannot confirm: class is already at capacity".into(),
                ));
            }
        }

        let cancelled_at = (new_status == BookingStatus::Cancelled).then(Utc::now);
        let event = OutboxEvent::new(
            tenant_id.to_string(),
            "booking.status_changed",
            json!({
                "booking_id": booking_id,
                "old_status": old_status.to_string(),
                "new_status": new_status.to_string(),
                "reason": reason,
            }),
        );

        let updated = self
            .bookings
            .update_status(tenant_id, booking_id, new_status, cancelled_at, vec![event])
            .await?;

        info!(
            booking_id = %booking_id,
            old_status = %old_status,
            new_status = %new_status,
            "Booking status updated"
        );
        Ok((old_status, updated))
    }

    /// Student self-cancellation. Ownership is verified; the freed seat is
    /// visible on the very next occupancy count since occupancy is never
    /// cached.
    pub async fn student_cancel(
        &self,
        tenant_id: &str,
        booking_id: &str,
        student_id: &str,
        reason: Option<String>,
    ) -> Result<Booking, AppError> {
        let booking = self
            .bookings
            .find_by_id(tenant_id, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if booking.student_id != student_id {
            // Same response as an unknown id so booking ids are not probeable.
            return Err(AppError::NotFound("Booking not found".into()));
        }
        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::Conflict(format!(
                "Booking in status {} cannot be cancelled",
                booking.status
            )));
        }

        let event = OutboxEvent::new(
            tenant_id.to_string(),
            "booking.cancelled",
            json!({
                "booking_id": booking_id,
                "student_id": student_id,
                "reason": reason,
            }),
        );

        let updated = self
            .bookings
            .update_status(
                tenant_id,
                booking_id,
                BookingStatus::Cancelled,
                Some(Utc::now()),
                vec![event],
            )
            .await?;

        info!(booking_id = %booking_id, "Booking cancelled by student");
        Ok(updated)
    }
}
