// Deck - application state behind a typed command interface
//
// The deck owns the event store and an RSVP store wired to it. Commands are
// serialised through one async mutex, so attendance counters, capacity and
// RSVP records change together or not at all.
//
// Flow per command:
// 1. Validate the payload against the submission instant
// 2. Apply the configured policies (duplicates, capacity)
// 3. Mutate both collections inside the critical section
// 4. Deliver notifications (failures are logged, never propagated)

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{DeckConfig, DuplicateRsvpPolicy, OverCapacityPolicy};
use crate::error::{EventDeckError, Result};
use crate::event::Event;
use crate::input::{CreateEventInput, UpdateEventInput};
use crate::notification::{NoOpNotificationSink, Notification};
use crate::rsvp::{Rsvp, RsvpStatus};
use crate::store::{EventStore, RsvpStore};
use crate::traits::NotificationSink;

/// A state-changing request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    CreateEvent(CreateEventInput),
    UpdateEvent {
        event_id: Uuid,
        input: UpdateEventInput,
    },
    DeleteEvent {
        event_id: Uuid,
    },
    Rsvp {
        event_id: Uuid,
        user_id: Uuid,
    },
    SetRsvpStatus {
        rsvp_id: Uuid,
        status: RsvpStatus,
    },
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateEvent(_) => "create_event",
            Command::UpdateEvent { .. } => "update_event",
            Command::DeleteEvent { .. } => "delete_event",
            Command::Rsvp { .. } => "rsvp",
            Command::SetRsvpStatus { .. } => "set_rsvp_status",
        }
    }
}

/// RSVP together with the event state it left behind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RsvpReceipt {
    pub rsvp: Rsvp,
    /// Current event, `None` if it has since been deleted
    pub event: Option<Event>,
    /// False when an existing RSVP was handed back instead of a new one
    pub created: bool,
}

/// Result of a successfully applied command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandOutcome {
    EventCreated(Event),
    EventUpdated(Event),
    EventDeleted { event_id: Uuid, deleted: bool },
    RsvpRecorded(RsvpReceipt),
    RsvpStatusChanged(RsvpReceipt),
}

/// Application state owning both collections.
pub struct Deck {
    config: DeckConfig,
    events: EventStore,
    rsvps: RsvpStore,
    notifications: Arc<dyn NotificationSink>,
    commands: Mutex<()>,
}

impl Deck {
    /// Create a deck with empty, not yet loaded stores
    pub fn new(config: DeckConfig) -> Self {
        let events = EventStore::from_config(&config);
        let rsvps = RsvpStore::from_config(Arc::new(events.clone()), &config);
        Self {
            config,
            events,
            rsvps,
            notifications: Arc::new(NoOpNotificationSink),
            commands: Mutex::new(()),
        }
    }

    /// Deliver notifications to `sink` instead of discarding them
    pub fn with_notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notifications = sink;
        self
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Load both stores concurrently.
    pub async fn load(&self) -> Result<()> {
        futures::try_join!(self.events.load(), self.rsvps.load())?;
        info!(
            events = self.events.len(),
            rsvps = self.rsvps.len(),
            "Deck loaded"
        );
        Ok(())
    }

    /// True until both stores have finished loading
    pub fn is_loading(&self) -> bool {
        self.events.is_loading() || self.rsvps.is_loading()
    }

    /// Current events, newest first
    pub fn events(&self) -> Vec<Event> {
        self.events.list()
    }

    /// Current RSVPs, oldest first
    pub fn rsvps(&self) -> Vec<Rsvp> {
        self.rsvps.list()
    }

    pub fn event(&self, id: Uuid) -> Option<Event> {
        self.events.get(id)
    }

    pub fn rsvp(&self, id: Uuid) -> Option<Rsvp> {
        self.rsvps.get(id)
    }

    /// Apply `command`, validating against the local wall clock.
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome> {
        self.execute_at(command, Local::now().naive_local()).await
    }

    /// Apply `command` as if submitted at `now`.
    pub async fn execute_at(
        &self,
        command: Command,
        now: NaiveDateTime,
    ) -> Result<CommandOutcome> {
        let name = command.name();
        let _guard = self.commands.lock().await;

        let result = match command {
            Command::CreateEvent(input) => self.create_event(input, now),
            Command::UpdateEvent { event_id, input } => self.update_event(event_id, input, now),
            Command::DeleteEvent { event_id } => self.delete_event(event_id),
            Command::Rsvp { event_id, user_id } => self.record_rsvp(event_id, user_id).await,
            Command::SetRsvpStatus { rsvp_id, status } => self.set_rsvp_status(rsvp_id, status),
        };

        match result {
            Ok((outcome, notifications)) => {
                self.deliver(notifications).await;
                Ok(outcome)
            }
            Err(e) => {
                warn!(command = name, error = %e, "Command rejected");
                Err(e)
            }
        }
    }

    // ========================================================================
    // Command handlers
    // ========================================================================

    fn create_event(
        &self,
        input: CreateEventInput,
        now: NaiveDateTime,
    ) -> Result<(CommandOutcome, Vec<Notification>)> {
        input.validate(now)?;
        let event = self.events.create(input);
        Ok((CommandOutcome::EventCreated(event), Vec::new()))
    }

    fn update_event(
        &self,
        event_id: Uuid,
        input: UpdateEventInput,
        now: NaiveDateTime,
    ) -> Result<(CommandOutcome, Vec<Notification>)> {
        let current = self
            .events
            .get(event_id)
            .ok_or(EventDeckError::EventNotFound(event_id))?;
        input.validate(&current, now)?;

        if let Some(capacity) = input.capacity {
            if !self.config.allow_capacity_below_attendance && capacity < current.rsvp_count {
                return Err(EventDeckError::CapacityBelowAttendance {
                    capacity,
                    rsvp_count: current.rsvp_count,
                });
            }
        }

        let updated = self
            .events
            .update(event_id, &input)
            .ok_or(EventDeckError::EventNotFound(event_id))?;

        let mut notifications: Vec<Notification> = if input.is_empty() {
            Vec::new()
        } else {
            self.attendees(event_id)
                .into_iter()
                .map(|user_id| Notification::event_updated(user_id, event_id, &updated.title))
                .collect()
        };
        notifications.extend(self.promote_waitlist(event_id, None));

        let event = self
            .events
            .get(event_id)
            .ok_or(EventDeckError::EventNotFound(event_id))?;
        Ok((CommandOutcome::EventUpdated(event), notifications))
    }

    fn delete_event(&self, event_id: Uuid) -> Result<(CommandOutcome, Vec<Notification>)> {
        let current = self.events.get(event_id);
        let deleted = self.events.delete(event_id);

        let notifications = match current {
            Some(event) if deleted => self
                .rsvps
                .list()
                .into_iter()
                .filter(|r| {
                    r.event_id == event_id
                        && matches!(r.status, RsvpStatus::Confirmed | RsvpStatus::Waitlist)
                })
                .map(|r| Notification::event_cancelled(r.user_id, event_id, &event.title))
                .collect(),
            _ => Vec::new(),
        };

        Ok((
            CommandOutcome::EventDeleted { event_id, deleted },
            notifications,
        ))
    }

    async fn record_rsvp(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(CommandOutcome, Vec<Notification>)> {
        let event = self
            .events
            .get(event_id)
            .ok_or(EventDeckError::EventNotFound(event_id))?;

        if let Some(existing) = self.rsvps.find(user_id, event_id) {
            match self.config.duplicate_rsvp {
                DuplicateRsvpPolicy::Allow => {}
                DuplicateRsvpPolicy::Reject => {
                    return Err(EventDeckError::DuplicateRsvp { user_id, event_id });
                }
                DuplicateRsvpPolicy::ReturnExisting => {
                    let receipt = RsvpReceipt {
                        rsvp: existing,
                        event: Some(event),
                        created: false,
                    };
                    return Ok((CommandOutcome::RsvpRecorded(receipt), Vec::new()));
                }
            }
        }

        let status = self.seat_status(&event)?;
        if status.holds_seat() {
            self.adjust_attendance(event_id, 1);
        }

        // The snapshot taken here already includes the seat just claimed.
        let rsvp = match self
            .rsvps
            .create_with_status(event_id, user_id, status)
            .await
        {
            Ok(rsvp) => rsvp,
            Err(e) => {
                if status.holds_seat() {
                    self.adjust_attendance(event_id, -1);
                }
                return Err(e);
            }
        };

        let notification = match status {
            RsvpStatus::Waitlist => Notification::waitlisted(user_id, event_id, &event.title),
            _ => Notification::rsvp_confirmed(user_id, event_id, &event.title),
        };

        let receipt = RsvpReceipt {
            rsvp,
            event: self.events.get(event_id),
            created: true,
        };
        Ok((CommandOutcome::RsvpRecorded(receipt), vec![notification]))
    }

    fn set_rsvp_status(
        &self,
        rsvp_id: Uuid,
        requested: RsvpStatus,
    ) -> Result<(CommandOutcome, Vec<Notification>)> {
        let rsvp = self
            .rsvps
            .get(rsvp_id)
            .ok_or(EventDeckError::RsvpNotFound(rsvp_id))?;
        let event_id = rsvp.event_id;
        let event = self.events.get(event_id);
        let mut notifications = Vec::new();

        let status = match (&event, rsvp.status.holds_seat(), requested.holds_seat()) {
            // Taking a seat on a live event goes through the capacity policy.
            (Some(event), false, true) => self.seat_status(event)?,
            _ => requested,
        };

        self.rsvps
            .update(rsvp_id, status)
            .ok_or(EventDeckError::RsvpNotFound(rsvp_id))?;

        if event.is_some() {
            match (rsvp.status.holds_seat(), status.holds_seat()) {
                (false, true) => self.adjust_attendance(event_id, 1),
                (true, false) => {
                    self.adjust_attendance(event_id, -1);
                    // The freed seat goes to someone else, never back to this RSVP.
                    notifications.extend(self.promote_waitlist(event_id, Some(rsvp_id)));
                }
                _ => {}
            }
        }

        let committed = self
            .rsvps
            .get(rsvp_id)
            .ok_or(EventDeckError::RsvpNotFound(rsvp_id))?;
        let receipt = RsvpReceipt {
            rsvp: committed,
            event: self.events.get(event_id),
            created: false,
        };
        Ok((CommandOutcome::RsvpStatusChanged(receipt), notifications))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Status a new seat request on `event` gets under the capacity policy.
    fn seat_status(&self, event: &Event) -> Result<RsvpStatus> {
        if event.rsvp_count < event.capacity {
            return Ok(RsvpStatus::Confirmed);
        }
        match self.config.over_capacity {
            OverCapacityPolicy::Waitlist => Ok(RsvpStatus::Waitlist),
            OverCapacityPolicy::Reject => Err(EventDeckError::EventFull(event.id)),
            OverCapacityPolicy::Allow => Ok(RsvpStatus::Confirmed),
        }
    }

    fn adjust_attendance(&self, event_id: Uuid, delta: i32) {
        self.events.modify(event_id, |event| {
            event.rsvp_count = event.rsvp_count.saturating_add_signed(delta);
        });
    }

    /// Users holding a seat at `event_id`
    fn attendees(&self, event_id: Uuid) -> Vec<Uuid> {
        self.rsvps
            .list()
            .into_iter()
            .filter(|r| r.event_id == event_id && r.status.holds_seat())
            .map(|r| r.user_id)
            .collect()
    }

    /// Confirm waitlisted RSVPs, oldest first, while seats are free.
    /// `skip` is left on the waitlist.
    fn promote_waitlist(&self, event_id: Uuid, skip: Option<Uuid>) -> Vec<Notification> {
        if self.config.over_capacity != OverCapacityPolicy::Waitlist {
            return Vec::new();
        }

        let mut notifications = Vec::new();
        let waiting = self
            .rsvps
            .list()
            .into_iter()
            .filter(|r| {
                r.event_id == event_id
                    && r.status == RsvpStatus::Waitlist
                    && Some(r.id) != skip
            });

        for rsvp in waiting {
            let Some(event) = self.events.get(event_id) else {
                break;
            };
            if event.rsvp_count >= event.capacity {
                break;
            }
            self.rsvps.update(rsvp.id, RsvpStatus::Confirmed);
            self.adjust_attendance(event_id, 1);
            info!(rsvp_id = %rsvp.id, %event_id, "Promoted from waitlist");
            notifications.push(Notification::promoted_from_waitlist(
                rsvp.user_id,
                event_id,
                &event.title,
            ));
        }
        notifications
    }

    async fn deliver(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            let kind = notification.kind;
            if let Err(e) = self.notifications.notify(notification).await {
                warn!(%kind, error = %e, "Failed to deliver notification");
            }
        }
    }
}
