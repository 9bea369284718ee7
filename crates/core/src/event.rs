// Event domain types
//
// These types represent the Event entity, its status, and the optional
// extension blocks. Extension blocks are carried and serialized but no
// logic in this crate reads them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::User;

/// Event lifecycle status.
/// - `upcoming`: Event is scheduled and has not started
/// - `ongoing`: Event is currently happening
/// - `past`: Event has finished
/// - `cancelled`: Event was called off by its host
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Event is scheduled and has not started.
    #[default]
    Upcoming,
    /// Event is currently happening.
    Ongoing,
    /// Event has finished.
    Past,
    /// Event was called off by its host.
    Cancelled,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Upcoming => write!(f, "upcoming"),
            EventStatus::Ongoing => write!(f, "ongoing"),
            EventStatus::Past => write!(f, "past"),
            EventStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl From<&str> for EventStatus {
    fn from(s: &str) -> Self {
        match s {
            "ongoing" => EventStatus::Ongoing,
            "past" => EventStatus::Past,
            "cancelled" => EventStatus::Cancelled,
            _ => EventStatus::Upcoming,
        }
    }
}

/// Ticket pricing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pricing {
    pub is_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_bird_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_bird_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Recurrence rule for repeating events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recurrence {
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<RecurrenceFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<NaiveDate>,
}

/// Feature flags advertised on the event page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventFeatures {
    pub has_livestream: bool,
    pub has_recording: bool,
    pub has_networking: bool,
    pub has_workshop: bool,
    pub has_q_and_a: bool,
    pub has_catering: bool,
    pub is_accessible: bool,
    pub has_parking: bool,
    pub has_wifi: bool,
}

/// Attendance requirements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_restriction: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dress_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub social_media_links: Vec<String>,
}

/// Engagement counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventAnalytics {
    pub views: u64,
    pub shares: u64,
    pub saves: u64,
}

/// Event - a hosted happening with schedule, location, capacity, and visibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Unique identifier for the event.
    pub id: Uuid,
    /// ID of the hosting user. Fixed at creation.
    pub host_id: Uuid,
    pub title: String,
    pub description: String,
    /// Calendar date the event takes place on.
    pub date: NaiveDate,
    /// Start time on `date`.
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub location: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Maximum number of confirmed attendees.
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether the event shows up in public browsing.
    pub is_public: bool,
    /// Timestamp when the event was created.
    pub created_at: DateTime<Utc>,
    /// Snapshot of the host's public profile.
    pub host: User,
    /// Denormalized count of confirmed RSVPs.
    pub rsvp_count: u32,
    pub status: EventStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<EventFeatures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<EventRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<EventAnalytics>,
}

impl Event {
    /// Local date and time the event starts.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// True when the event date falls after `today`.
    pub fn is_after(&self, today: NaiveDate) -> bool {
        self.date > today
    }

    pub fn is_hosted_by(&self, host_id: Uuid) -> bool {
        self.host_id == host_id
    }
}
