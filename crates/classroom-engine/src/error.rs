//! Error types for classroom-engine operations.
//!
//! Every variant describes why a single ingestion row could not become a
//! [`MeetingRecord`](crate::record::MeetingRecord). Index construction logs and
//! skips these; queries never produce them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("Invalid number in field `{field}`: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Time {hour:02}:{minute:02} is outside of a single day")]
    TimeOutOfRange { hour: u32, minute: u32 },

    #[error("Start or end time is unset (zero minutes)")]
    ZeroTime,

    #[error("Invalid day pattern: {0:?}")]
    InvalidDays(String),

    #[error("Invalid exact date: {0:?}")]
    InvalidDate(String),

    #[error("Building code is empty")]
    EmptyBuilding,

    #[error("Room code is empty")]
    EmptyRoom,

    #[error("Building {0:?} is a placeholder for online or unassigned sections")]
    ReservedBuilding(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
