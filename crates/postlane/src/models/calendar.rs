//! Calendars and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    /// Calendar id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Geographic location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// IANA time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Events cannot be modified.
    #[serde(default)]
    pub read_only: bool,
    /// The account's primary calendar.
    #[serde(default)]
    pub is_primary: bool,
    /// Owned by the grant's user.
    #[serde(default)]
    pub is_owned_by_user: bool,
    /// Display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_color: Option<String>,
}

/// Fields for creating or updating a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Geographic location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// IANA time zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// An event attendee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParticipant {
    /// Address.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// RSVP status, e.g. `yes`, `noreply`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// When an event happens: a timespan, or an all-day date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWhen {
    /// Start of a timespan.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    /// End of a timespan.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    /// Time zone of the start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timezone: Option<String>,
    /// Time zone of the end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timezone: Option<String>,
    /// All-day date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventWhen {
    /// A timespan.
    #[must_use]
    pub fn timespan(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start),
            end_time: Some(end),
            ..Self::default()
        }
    }
}

/// A calendar event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// Calendar holding the event.
    #[serde(default)]
    pub calendar_id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Shows the user as busy.
    #[serde(default)]
    pub busy: bool,
    /// Attendees.
    #[serde(default)]
    pub participants: Vec<EventParticipant>,
    /// Timing.
    #[serde(default)]
    pub when: EventWhen,
    /// `confirmed`, `tentative` or `cancelled`.
    #[serde(default)]
    pub status: String,
    /// Cannot be modified.
    #[serde(default)]
    pub read_only: bool,
}

super::common::identified!(Calendar, Event);

/// Filters for listing events. `calendar_id` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventQuery {
    /// Calendar to list.
    pub calendar_id: String,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    /// Events ending after this time.
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<DateTime<Utc>>,
    /// Events starting before this time.
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<DateTime<Utc>>,
    /// Title filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl EventQuery {
    /// Query for one calendar.
    #[must_use]
    pub fn for_calendar(calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            ..Self::default()
        }
    }
}

/// Fields for creating or updating an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventRequest {
    /// Title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Shows the user as busy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy: Option<bool>,
    /// Attendees.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<EventParticipant>,
    /// Timing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<EventWhen>,
}
