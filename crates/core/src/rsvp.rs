// RSVP domain types
//
// An RSVP carries snapshots of the attendee profile and the referenced
// event taken at creation time. Later event edits do not flow back into it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;
use crate::user::User;

/// Attendance status of an RSVP.
/// - `confirmed`: holds a seat and counts toward the event's attendance
/// - `pending`: awaiting confirmation
/// - `declined`: the user will not attend
/// - `waitlist`: the event was full when the user asked for a seat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Confirmed,
    Pending,
    Declined,
    Waitlist,
}

impl RsvpStatus {
    /// Whether this status occupies a seat.
    pub fn holds_seat(&self) -> bool {
        matches!(self, RsvpStatus::Confirmed)
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsvpStatus::Confirmed => write!(f, "confirmed"),
            RsvpStatus::Pending => write!(f, "pending"),
            RsvpStatus::Declined => write!(f, "declined"),
            RsvpStatus::Waitlist => write!(f, "waitlist"),
        }
    }
}

impl std::str::FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(RsvpStatus::Confirmed),
            "pending" => Ok(RsvpStatus::Pending),
            "declined" => Ok(RsvpStatus::Declined),
            "waitlist" => Ok(RsvpStatus::Waitlist),
            other => Err(format!("unknown RSVP status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// RSVP - a user's attendance commitment against one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rsvp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: RsvpStatus,
    pub created_at: DateTime<Utc>,
    /// Snapshot of the attendee's profile.
    pub user: User,
    /// Snapshot of the event at the moment the RSVP was created.
    pub event: Event,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dietary_restrictions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plus_ones: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

impl Rsvp {
    pub fn is_for(&self, user_id: Uuid, event_id: Uuid) -> bool {
        self.user_id == user_id && self.event_id == event_id
    }
}
