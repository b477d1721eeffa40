use thiserror::Error;

use crate::clock::{ClockTime, Weekday};

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Invalid slot configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Time slot conflicts with existing selection {start_time}-{end_time} on {day}")]
    SlotConflict {
        day: Weekday,
        start_time: ClockTime,
        end_time: ClockTime,
    },

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type ClinicResult<T> = Result<T, ClinicError>;
