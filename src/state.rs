use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    BlockRepository, BookingRepository, ClassRepository, ClassTypeRepository,
    NotificationSink, OutboxRepository, ScheduleRepository, StudentRepository,
    TenantRepository,
};
use crate::domain::services::booking_engine::BookingEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub student_repo: Arc<dyn StudentRepository>,
    pub class_type_repo: Arc<dyn ClassTypeRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub block_repo: Arc<dyn BlockRepository>,
    pub class_repo: Arc<dyn ClassRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub outbox_repo: Arc<dyn OutboxRepository>,
    pub booking_engine: Arc<BookingEngine>,
    pub notification_sink: Arc<dyn NotificationSink>,
}
