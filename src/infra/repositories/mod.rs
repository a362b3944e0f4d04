pub mod sqlite_block_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_class_repo;
pub mod sqlite_class_type_repo;
pub mod sqlite_outbox_repo;
pub mod sqlite_schedule_repo;
pub mod sqlite_student_repo;
pub mod sqlite_tenant_repo;
