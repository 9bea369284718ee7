// Notifications emitted by deck commands
//
// Notifications are fire-and-forget: a failing sink is logged by the deck
// and never rolls back the command that produced the notification.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::traits::NotificationSink;

/// Kind of notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RsvpConfirmation,
    EventReminder,
    EventUpdate,
    EventCancelled,
    WaitlistAvailable,
    PaymentReminder,
    EventStartingSoon,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationKind::RsvpConfirmation => "rsvp_confirmation",
            NotificationKind::EventReminder => "event_reminder",
            NotificationKind::EventUpdate => "event_update",
            NotificationKind::EventCancelled => "event_cancelled",
            NotificationKind::WaitlistAvailable => "waitlist_available",
            NotificationKind::PaymentReminder => "payment_reminder",
            NotificationKind::EventStartingSoon => "event_starting_soon",
        };
        write!(f, "{s}")
    }
}

/// A message addressed to one user about one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        event_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            event_id,
            kind,
            title: title.into(),
            message: message.into(),
            is_read: false,
            created_at: Utc::now(),
            action_url: None,
        }
    }

    pub fn rsvp_confirmed(user_id: Uuid, event_id: Uuid, event_title: &str) -> Self {
        Self::new(
            user_id,
            event_id,
            NotificationKind::RsvpConfirmation,
            "RSVP confirmed",
            format!("You're going to {event_title}."),
        )
    }

    pub fn waitlisted(user_id: Uuid, event_id: Uuid, event_title: &str) -> Self {
        Self::new(
            user_id,
            event_id,
            NotificationKind::RsvpConfirmation,
            "Added to waitlist",
            format!("{event_title} is full. You're on the waitlist."),
        )
    }

    pub fn promoted_from_waitlist(user_id: Uuid, event_id: Uuid, event_title: &str) -> Self {
        Self::new(
            user_id,
            event_id,
            NotificationKind::WaitlistAvailable,
            "A spot opened up",
            format!("A spot opened up at {event_title}. Your RSVP is confirmed."),
        )
    }

    pub fn event_updated(user_id: Uuid, event_id: Uuid, event_title: &str) -> Self {
        Self::new(
            user_id,
            event_id,
            NotificationKind::EventUpdate,
            "Event updated",
            format!("{event_title} has new details."),
        )
    }

    pub fn event_cancelled(user_id: Uuid, event_id: Uuid, event_title: &str) -> Self {
        Self::new(
            user_id,
            event_id,
            NotificationKind::EventCancelled,
            "Event cancelled",
            format!("{event_title} has been cancelled."),
        )
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }
}

// ============================================================================
// InMemoryNotificationSink - Collects notifications
// ============================================================================

/// In-memory notification sink
///
/// Collects every notification it receives. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct InMemoryNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    /// Notifications addressed to one user
    pub fn for_user(&self, user_id: Uuid) -> Vec<Notification> {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.lock().is_empty()
    }

    pub fn clear(&self) {
        self.notifications.lock().clear();
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn notify(&self, notification: Notification) -> Result<()> {
        self.notifications.lock().push(notification);
        Ok(())
    }
}

// ============================================================================
// NoOpNotificationSink - Discards notifications
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotificationSink;

#[async_trait]
impl NotificationSink for NoOpNotificationSink {
    async fn notify(&self, _notification: Notification) -> Result<()> {
        Ok(())
    }
}
