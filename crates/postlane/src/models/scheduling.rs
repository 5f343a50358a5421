//! Scheduler (booking page) configurations.

use serde::{Deserialize, Serialize};

/// A booking page configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfiguration {
    /// Configuration id.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Public URL slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Booking needs a session token.
    #[serde(default)]
    pub requires_session_auth: bool,
    /// Hosts.
    #[serde(default)]
    pub participants: Vec<SchedulerParticipant>,
    /// Slot rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    /// Event created on booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_booking: Option<EventBooking>,
}

super::common::identified!(SchedulerConfiguration);

/// A host on a booking page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerParticipant {
    /// Address.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owns the booked event.
    #[serde(default)]
    pub is_organizer: bool,
}

/// Slot rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Meeting length.
    #[serde(default)]
    pub duration_minutes: u32,
    /// Spacing between offered slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_minutes: Option<u32>,
}

/// Template for booked events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBooking {
    /// Event title.
    #[serde(default)]
    pub title: String,
    /// Event description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Event location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Fields for creating or updating a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerConfigurationRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Public URL slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Booking needs a session token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_session_auth: Option<bool>,
    /// Hosts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<SchedulerParticipant>,
    /// Slot rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    /// Event created on booking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_booking: Option<EventBooking>,
}
