// Core traits for pluggable collaborators
//
// These traits decouple the stores from each other and from whatever
// consumes their notifications:
// - EventSource gives the RSVP store a live read of current event state
// - NotificationSink receives domain notifications from the deck

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::event::Event;
use crate::notification::Notification;

// ============================================================================
// EventSource - Live read access to events
// ============================================================================

/// Read access to the current state of events.
///
/// Implementations can:
/// - Read from the in-memory event store
/// - Serve a fixed set of events in tests
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Get an event by ID
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>>;
}

// ============================================================================
// NotificationSink - For delivering domain notifications
// ============================================================================

/// Receiver of notifications produced by deck commands.
///
/// Implementations can:
/// - Collect notifications in memory for testing or display
/// - Forward them to an outbox
/// - Do nothing (no-op implementation)
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a single notification
    async fn notify(&self, notification: Notification) -> Result<()>;

    /// Deliver multiple notifications
    async fn notify_batch(&self, notifications: Vec<Notification>) -> Result<()> {
        for notification in notifications {
            self.notify(notification).await?;
        }
        Ok(())
    }
}
