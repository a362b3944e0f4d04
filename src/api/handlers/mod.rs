pub mod availability;
pub mod block;
pub mod booking;
pub mod class;
pub mod class_type;
pub mod health;
pub mod schedule;
pub mod student;
pub mod tenant;
