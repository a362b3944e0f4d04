use crate::domain::models::{
    booking::{Booking, BookingStatus},
    outbox::OutboxEvent,
};
use crate::domain::ports::BookingRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn count_active_tx(
    tx: &mut Transaction<'_, Sqlite>,
    class_id: &str,
) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bookings WHERE class_id = ? AND status IN ('pending', 'confirmed')",
    )
    .bind(class_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count)
}

async fn has_active_for_student_tx(
    tx: &mut Transaction<'_, Sqlite>,
    class_id: &str,
    student_id: &str,
) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bookings
         WHERE class_id = ? AND student_id = ? AND status IN ('pending', 'confirmed')",
    )
    .bind(class_id)
    .bind(student_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count > 0)
}

async fn insert_booking_tx(
    tx: &mut Transaction<'_, Sqlite>,
    booking: &Booking,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO bookings (id, tenant_id, class_id, student_id, status, attended, notes, booked_at, cancelled_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&booking.id)
    .bind(&booking.tenant_id)
    .bind(&booking.class_id)
    .bind(&booking.student_id)
    .bind(booking.status)
    .bind(booking.attended)
    .bind(&booking.notes)
    .bind(booking.booked_at)
    .bind(booking.cancelled_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_events_tx(
    tx: &mut Transaction<'_, Sqlite>,
    events: &[OutboxEvent],
) -> Result<(), AppError> {
    for event in events {
        sqlx::query(
            "INSERT INTO outbox_events (id, tenant_id, event_type, payload, status, error_message, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.tenant_id)
        .bind(&event.event_type)
        .bind(&event.payload)
        .bind(&event.status)
        .bind(&event.error_message)
        .bind(event.created_at)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn reserve(
        &self,
        booking: &Booking,
        max_students: i32,
        events: Vec<OutboxEvent>,
    ) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        // Occupancy is re-counted inside the transaction; the caller's
        // per-class lock serializes competing reservations, so exactly one
        // request wins the last seat.
        let occupancy = count_active_tx(&mut tx, &booking.class_id).await?;
        if occupancy >= i64::from(max_students) {
            return Err(AppError::Conflict("Class is fully booked".into()));
        }
        if has_active_for_student_tx(&mut tx, &booking.class_id, &booking.student_id).await? {
            return Err(AppError::Conflict(
                "Student already has an active booking for this class".into(),
            ));
        }

        insert_booking_tx(&mut tx, booking).await?;
        insert_events_tx(&mut tx, &events).await?;
        tx.commit().await?;

        Ok(occupancy + 1)
    }

    async fn reserve_many(
        &self,
        bookings: &[Booking],
        capacities: &HashMap<String, i32>,
        events: Vec<OutboxEvent>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let mut errors = Vec::new();
        for booking in bookings {
            let max = capacities
                .get(&booking.class_id)
                .copied()
                .ok_or(AppError::Internal)?;
            let occupancy = count_active_tx(&mut tx, &booking.class_id).await?;
            if occupancy >= i64::from(max) {
                errors.push(json!({
                    "class_id": booking.class_id,
                    "error": "Class is fully booked",
                }));
            } else if has_active_for_student_tx(&mut tx, &booking.class_id, &booking.student_id)
                .await?
            {
                errors.push(json!({
                    "class_id": booking.class_id,
                    "error": "Student already has an active booking for this class",
                }));
            }
        }

        // Dropping the transaction without commit rolls everything back:
        // either the whole batch lands or none of it does.
        if !errors.is_empty() {
            return Err(AppError::ConflictWithDetails {
                message: "Bulk booking failed; no bookings were created".into(),
                details: json!({ "errors": errors }),
            });
        }

        for booking in bookings {
            insert_booking_tx(&mut tx, booking).await?;
        }
        insert_events_tx(&mut tx, &events).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE tenant_id = ? AND id = ?",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE tenant_id = ? ORDER BY booked_at ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn list_by_class(&self, tenant_id: &str, class_id: &str) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE tenant_id = ? AND class_id = ? ORDER BY booked_at ASC",
        )
        .bind(tenant_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn find_active_by_student(
        &self,
        class_id: &str,
        student_id: &str,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings
             WHERE class_id = ? AND student_id = ? AND status IN ('pending', 'confirmed')",
        )
        .bind(class_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn count_active(&self, class_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE class_id = ? AND status IN ('pending', 'confirmed')",
        )
        .bind(class_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_active_excluding(&self, class_id: &str, booking_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings
             WHERE class_id = ? AND id != ? AND status IN ('pending', 'confirmed')",
        )
        .bind(class_id)
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_active_for_classes(
        &self,
        class_ids: &[String],
    ) -> Result<HashMap<String, i64>, AppError> {
        let mut counts = HashMap::with_capacity(class_ids.len());
        for class_id in class_ids {
            counts.insert(class_id.clone(), self.count_active(class_id).await?);
        }
        Ok(counts)
    }

    async fn find_active_in_range(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT b.* FROM bookings b
             JOIN classes c ON c.id = b.class_id
             WHERE b.tenant_id = ? AND b.status IN ('pending', 'confirmed')
               AND c.is_cancelled = 0 AND c.starts_at < ? AND c.ends_at > ?",
        )
        .bind(tenant_id)
        .bind(end)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn update_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: BookingStatus,
        cancelled_at: Option<DateTime<Utc>>,
        events: Vec<OutboxEvent>,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ?, cancelled_at = COALESCE(?, cancelled_at)
             WHERE id = ? AND tenant_id = ?
             RETURNING *",
        )
        .bind(status)
        .bind(cancelled_at)
        .bind(id)
        .bind(tenant_id)
        .fetch_one(&mut *tx)
        .await?;
        insert_events_tx(&mut tx, &events).await?;
        tx.commit().await?;
        Ok(updated)
    }
}
