pub mod availability;
pub mod booking_engine;
pub mod conflict;
pub mod expander;
pub mod time_range;
