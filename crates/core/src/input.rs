// Command payloads
//
// Strict payload types for event creation and editing. Validation runs at
// the deck boundary; the raw stores accept whatever they are given.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationErrors};
use crate::event::{
    Event, EventAnalytics, EventFeatures, EventRequirements, EventStatus, Pricing, Recurrence,
    SocialMetadata,
};
use crate::user::{User, UserRole};

/// Payload for creating an event.
///
/// Carries everything an [`Event`] has except the fields the store assigns:
/// `id`, `created_at`, `host`, `rsvp_count` and `status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateEventInput {
    pub host_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    pub location: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub capacity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub recurring: Option<Recurrence>,
    #[serde(default)]
    pub features: Option<EventFeatures>,
    #[serde(default)]
    pub requirements: Option<EventRequirements>,
    #[serde(default)]
    pub social: Option<SocialMetadata>,
    #[serde(default)]
    pub analytics: Option<EventAnalytics>,
}

fn default_is_public() -> bool {
    true
}

/// Capacity a new event form starts with.
pub const DEFAULT_CAPACITY: u32 = 50;

/// Category a new event form starts with.
pub const DEFAULT_CATEGORY: &str = "Technology";

impl CreateEventInput {
    /// Create a public event payload with the required fields.
    pub fn new(
        host_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        location: impl Into<String>,
    ) -> Self {
        Self {
            host_id,
            title: title.into(),
            description: description.into(),
            date,
            time,
            end_time: None,
            location: location.into(),
            category: DEFAULT_CATEGORY.to_string(),
            subcategory: None,
            tags: Vec::new(),
            capacity: DEFAULT_CAPACITY,
            image_url: None,
            is_public: true,
            pricing: None,
            recurring: None,
            features: None,
            requirements: None,
            social: None,
            analytics: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_end_time(mut self, end_time: NaiveTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Build the stored event. The host profile is a stub derived from
    /// `host_id`; attendance starts at zero and status at upcoming.
    pub fn into_event(self, id: Uuid, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            host_id: self.host_id,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            end_time: self.end_time,
            location: self.location,
            category: self.category,
            subcategory: self.subcategory,
            tags: self.tags,
            capacity: self.capacity,
            image_url: self.image_url,
            is_public: self.is_public,
            created_at,
            host: User::stub(self.host_id, UserRole::Host),
            rsvp_count: 0,
            status: EventStatus::Upcoming,
            pricing: self.pricing,
            recurring: self.recurring,
            features: self.features,
            requirements: self.requirements,
            social: self.social,
            analytics: self.analytics,
        }
    }

    /// Validate against the submission instant `now`.
    ///
    /// Required strings must be non-blank, capacity at least 1, and the
    /// start strictly after `now`.
    pub fn validate(&self, now: NaiveDateTime) -> Result<()> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "title", "Title", &self.title);
        check_required(&mut errors, "description", "Description", &self.description);
        check_required(&mut errors, "location", "Location", &self.location);
        check_capacity(&mut errors, self.capacity);
        check_future(&mut errors, self.date, self.time, now);
        errors.into_result()
    }
}

/// Payload for editing an event. Only set fields are applied.
///
/// There is no host field: ownership never changes after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateEventInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

impl UpdateEventInput {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the set fields into `event`. Applying the same input twice
    /// leaves the event as after the first application.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = Some(end_time);
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(category) = &self.category {
            event.category = category.clone();
        }
        if let Some(subcategory) = &self.subcategory {
            event.subcategory = Some(subcategory.clone());
        }
        if let Some(tags) = &self.tags {
            event.tags = tags.clone();
        }
        if let Some(capacity) = self.capacity {
            event.capacity = capacity;
        }
        if let Some(image_url) = &self.image_url {
            event.image_url = Some(image_url.clone());
        }
        if let Some(is_public) = self.is_public {
            event.is_public = is_public;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
    }

    /// Validate the set fields against the stored `current` event.
    ///
    /// The future-start rule only applies when the schedule is being
    /// changed; the missing half of date/time comes from `current`.
    pub fn validate(&self, current: &Event, now: NaiveDateTime) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_required(&mut errors, "title", "Title", title);
        }
        if let Some(description) = &self.description {
            check_required(&mut errors, "description", "Description", description);
        }
        if let Some(location) = &self.location {
            check_required(&mut errors, "location", "Location", location);
        }
        if let Some(capacity) = self.capacity {
            check_capacity(&mut errors, capacity);
        }
        if self.date.is_some() || self.time.is_some() {
            let date = self.date.unwrap_or(current.date);
            let time = self.time.unwrap_or(current.time);
            check_future(&mut errors, date, time, now);
        }
        errors.into_result()
    }
}

fn check_required(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required"));
    }
}

fn check_capacity(errors: &mut ValidationErrors, capacity: u32) {
    if capacity < 1 {
        errors.add("capacity", "Capacity must be at least 1");
    }
}

fn check_future(
    errors: &mut ValidationErrors,
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) {
    if date.and_time(time) <= now {
        errors.add("date", "Event must be scheduled for a future date and time");
    }
}
