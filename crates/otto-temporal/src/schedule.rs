//! The create-event tool contract.
//!
//! Turns the arguments a conversational model passes to the "create calendar
//! event" tool into the payload the calendar backend accepts, and turns the
//! backend's answer into a sentence that can be spoken back. The HTTP call
//! itself belongs to the caller; everything here is pure.
//!
//! Identity and the reference instant travel in an explicit [`ToolContext`]
//! rather than ambient state, so concurrent sessions never observe each
//! other's user.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::temporal::{resolve_date, resolve_time, ResolvedDate, ResolvedTime};

/// Meeting length used when the model does not supply one.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

/// Arguments of a create-event tool call, as sent by the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleRequest {
    pub title: String,
    /// Date phrase: `"tomorrow"`, `"friday"`, `"Jan 3rd"`, `"2026-01-20"`, …
    pub date: String,
    /// Time phrase: `"3pm"`, `"3:30 PM"`, `"14:00"`, …
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    /// Comma-separated attendee emails.
    #[serde(default)]
    pub attendees: Option<String>,
}

/// Per-call context supplied by the session that invoked the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolContext {
    /// The signed-in user the backend call is made on behalf of.
    pub user_id: Option<String>,
    /// The instant treated as "now" when resolving relative phrases.
    pub reference: NaiveDateTime,
}

/// The JSON body posted to the calendar backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPayload {
    pub title: String,
    pub date: ResolvedDate,
    pub time: ResolvedTime,
    /// Length in minutes.
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
}

/// A payload ready to send, paired with the identity to send it as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub user_id: String,
    pub payload: EventPayload,
}

/// What came back from the calendar backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    /// The backend answered with this HTTP status.
    Status(u16),
    /// The request never completed (connection refused, timeout, …).
    Transport(String),
}

/// Validate a tool call and build the backend request.
///
/// The date phrase is resolved against `context.reference`'s date. Phrases
/// that cannot be resolved are forwarded verbatim; they are not errors here.
///
/// # Errors
///
/// Returns [`ScheduleError::MissingUser`] if the context carries no user,
/// or [`ScheduleError::InvalidDuration`] for a zero-minute meeting.
pub fn prepare_event(request: &ScheduleRequest, context: &ToolContext) -> Result<EventRequest> {
    let user_id = context
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ScheduleError::MissingUser)?;

    if request.duration_minutes == 0 {
        return Err(ScheduleError::InvalidDuration(request.duration_minutes));
    }

    let date = resolve_date(&request.date, context.reference.date());
    let time = resolve_time(&request.time);

    if !date.is_resolved() {
        tracing::warn!(phrase = %request.date, "forwarding unresolved date phrase to backend");
    }
    if !time.is_well_formed() {
        tracing::warn!(phrase = %request.time, "forwarding malformed time to backend");
    }

    let payload = EventPayload {
        title: request.title.clone(),
        date,
        time,
        duration: request.duration_minutes,
        attendees: request.attendees.as_deref().and_then(split_attendees),
    };

    tracing::info!(
        user_id,
        title = %payload.title,
        date = %payload.date,
        time = %payload.time,
        "prepared calendar event"
    );

    Ok(EventRequest {
        user_id: user_id.to_string(),
        payload,
    })
}

/// Split a comma-separated attendee list, trimming entries and dropping blanks.
fn split_attendees(raw: &str) -> Option<Vec<String>> {
    let attendees: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect();

    if attendees.is_empty() {
        None
    } else {
        Some(attendees)
    }
}

/// The sentence spoken after the backend call for `payload` finished.
pub fn spoken_reply(payload: &EventPayload, outcome: &BackendOutcome) -> String {
    match outcome {
        BackendOutcome::Status(status) if (200..300).contains(status) => format!(
            "Done! I've scheduled '{}' for {} at {}.",
            payload.title, payload.date, payload.time
        ),
        BackendOutcome::Status(401) => {
            "Google Calendar is not connected. Please connect it in your dashboard.".to_string()
        }
        BackendOutcome::Status(status) => {
            tracing::error!(status, "calendar create failed");
            "I couldn't create the event right now.".to_string()
        }
        BackendOutcome::Transport(reason) => {
            tracing::error!(%reason, "calendar create request did not complete");
            "There was an error creating the calendar event.".to_string()
        }
    }
}
