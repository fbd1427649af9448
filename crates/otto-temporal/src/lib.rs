//! # otto-temporal
//!
//! Spoken date/time resolution for a voice scheduling assistant.
//!
//! A user who says "book a sync with Ana next friday at 3pm" produces loose
//! phrases; the calendar backend wants `2025-06-06` and `15:00`. This crate
//! bridges the two deterministically, against an explicit reference date,
//! and never fails on input it does not understand: unresolved phrases are
//! passed through for the backend or the conversation to deal with.
//!
//! ## Modules
//!
//! - [`temporal`] — Date phrase → calendar date, time phrase → 24-hour time
//! - [`schedule`] — Create-event tool arguments → backend payload → spoken reply
//! - [`error`] — Error types

pub mod error;
pub mod schedule;
pub mod temporal;

pub use error::ScheduleError;
pub use schedule::{
    prepare_event, spoken_reply, BackendOutcome, EventPayload, EventRequest, ScheduleRequest,
    ToolContext, DEFAULT_DURATION_MINUTES,
};
pub use temporal::{resolve_date, resolve_time, ResolvedDate, ResolvedTime};
