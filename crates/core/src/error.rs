// Error types for event and RSVP state handling

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for deck operations
pub type Result<T> = std::result::Result<T, EventDeckError>;

/// Field-level validation failures, keyed by field name.
///
/// Mirrors what a form shows inline: one message per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`. A later failure on the same field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(EventDeckError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Errors that can occur while applying commands to the deck
#[derive(Debug, Error)]
pub enum EventDeckError {
    /// Referenced event does not exist
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    /// Referenced RSVP does not exist
    #[error("RSVP not found: {0}")]
    RsvpNotFound(Uuid),

    /// Command payload failed boundary validation
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// User already holds an RSVP for this event
    #[error("User {user_id} already has an RSVP for event {event_id}")]
    DuplicateRsvp { user_id: Uuid, event_id: Uuid },

    /// No seats left and the deck is configured to reject
    #[error("Event {0} is full")]
    EventFull(Uuid),

    /// Update would shrink capacity below confirmed attendance
    #[error("Capacity {capacity} is below current attendance {rsvp_count}")]
    CapacityBelowAttendance { capacity: u32, rsvp_count: u32 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EventDeckError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        EventDeckError::Configuration(msg.into())
    }

    /// Whether the error came from user input rather than a missing record
    /// or an internal fault. Front ends keep the form open on these.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EventDeckError::Validation(_)
                | EventDeckError::DuplicateRsvp { .. }
                | EventDeckError::EventFull(_)
                | EventDeckError::CapacityBelowAttendance { .. }
        )
    }
}
