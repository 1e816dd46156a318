use thiserror::Error;

use crate::models::SessionStatus;

/// Bad set or finish input. Returned to the caller for inline feedback; the
/// session stays alive and unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Weight must be a positive number: {0}")]
    InvalidWeight(String),

    #[error("Reps must be a non-negative whole number: {0}")]
    InvalidReps(i64),

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("{field} exceeds the maximum of {max}")]
    OutOfRange { field: &'static str, max: f64 },

    #[error("Rating must be between 1 and 5: {0}")]
    InvalidRating(u8),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cannot {action} while session is {status}")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },

    #[error("Exercise index {index} is out of range (plan has {len} exercises)")]
    ExerciseOutOfRange { index: usize, len: usize },

    #[error("{remaining} planned sets remain; request an early finish to end now")]
    SetsRemaining { remaining: u32 },

    #[error("A rest timer is already running")]
    TimerAlreadyActive,

    #[error("No rest timer is running")]
    NoActiveTimer,

    #[error("No planned sets remain at this position; finish the workout or jump to an exercise")]
    NoRemainingSets,

    #[error("Invalid workout plan: {0}")]
    InvalidPlan(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
