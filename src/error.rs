use thiserror::Error;

/// Errors surfaced by availability operations.
///
/// All variants are input-validation failures detected before any mutation;
/// the store and cache are left untouched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("invalid time format {0:?}: expected HH:MM or N/A")]
    InvalidFormat(String),

    #[error("both start and end must be N/A to mark a day unavailable")]
    InconsistentSentinel,

    #[error("start time {start} must be earlier than end time {end}")]
    InvalidRange { start: String, end: String },

    #[error("unknown user: {0}")]
    UnknownUser(String),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
