use crate::domain::models::{
    block::Block,
    booking::{Booking, BookingStatus},
    class::Class,
    class_type::ClassType,
    outbox::OutboxEvent,
    schedule::Schedule,
    student::Student,
    tenant::Tenant,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, student: &Student) -> Result<Student, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Student>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Student>, AppError>;
}

#[async_trait]
pub trait ClassTypeRepository: Send + Sync {
    async fn create(&self, class_type: &ClassType) -> Result<ClassType, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<ClassType>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<ClassType>, AppError>;
    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create(&self, schedule: &Schedule) -> Result<Schedule, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Schedule>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Schedule>, AppError>;
    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn create(&self, block: &Block) -> Result<Block, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Block>, AppError>;
    async fn list_in_range(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Block>, AppError>;
    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn create(&self, class: &Class) -> Result<Class, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Class>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Class>, AppError>;
    /// All classes (cancelled included) overlapping `[start, end)`.
    /// Callers filter by cancellation state as needed.
    async fn list_in_range(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Class>, AppError>;
    async fn cancel(&self, tenant_id: &str, id: &str, reason: Option<String>) -> Result<Class, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Seat reservation: inside one transaction, re-count active bookings
    /// for the class, reject on capacity or duplicate-active, insert the
    /// booking and any outbox events. Returns the occupancy after insert.
    async fn reserve(
        &self,
        booking: &Booking,
        max_students: i32,
        events: Vec<OutboxEvent>,
    ) -> Result<i64, AppError>;

    /// All-or-nothing batch variant of [`reserve`](Self::reserve): every
    /// class is re-counted and inserted in a single transaction; any
    /// failure rolls the whole batch back.
    async fn reserve_many(
        &self,
        bookings: &[Booking],
        capacities: &std::collections::HashMap<String, i32>,
        events: Vec<OutboxEvent>,
    ) -> Result<(), AppError>;

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_class(&self, tenant_id: &str, class_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn find_active_by_student(
        &self,
        class_id: &str,
        student_id: &str,
    ) -> Result<Option<Booking>, AppError>;
    async fn count_active(&self, class_id: &str) -> Result<i64, AppError>;
    async fn count_active_excluding(&self, class_id: &str, booking_id: &str) -> Result<i64, AppError>;
    async fn count_active_for_classes(
        &self,
        class_ids: &[String],
    ) -> Result<std::collections::HashMap<String, i64>, AppError>;
    /// Active bookings whose class overlaps `[start, end)`; used by the
    /// block-creation orphan check.
    async fn find_active_in_range(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError>;
    async fn update_status(
        &self,
        tenant_id: &str,
        id: &str,
        status: BookingStatus,
        cancelled_at: Option<DateTime<Utc>>,
        events: Vec<OutboxEvent>,
    ) -> Result<Booking, AppError>;
}

#[async_trait]
pub trait OutboxRepository: Send + Sync {
    async fn find_pending(&self, limit: i32) -> Result<Vec<OutboxEvent>, AppError>;
    async fn update_status(
        &self,
        id: &str,
        status: &str,
        error_message: Option<String>,
    ) -> Result<(), AppError>;
}

/// Outbound notification/audit collaborator. Fire-and-forget: dispatch
/// failures are recorded on the outbox row and never surface to the
/// request that produced the event.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn dispatch(&self, event: &OutboxEvent) -> Result<(), AppError>;
}
