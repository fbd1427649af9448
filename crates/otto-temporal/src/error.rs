//! Error types for scheduling tool operations.
//!
//! Date and time resolution never fails; these errors only arise when the
//! tool-call context or arguments are unusable.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Missing user identity")]
    MissingUser,

    #[error("Invalid duration: {0} minutes")]
    InvalidDuration(u32),
}

impl ScheduleError {
    /// The sentence read back to the user in place of this error.
    pub fn spoken(&self) -> &'static str {
        match self {
            ScheduleError::MissingUser => {
                "I don't know whose calendar to use yet. Please sign in and try again."
            }
            ScheduleError::InvalidDuration(_) => {
                "I need a meeting length longer than zero minutes to schedule that."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
