pub mod auth;
pub mod block;
pub mod booking;
pub mod class;
pub mod class_type;
pub mod outbox;
pub mod schedule;
pub mod student;
pub mod tenant;
