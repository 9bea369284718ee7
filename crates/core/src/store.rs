// In-memory event and RSVP stores
// Decision: Use parking_lot for thread-safe access to the collections
// Decision: IDs generated via uuid v7 (time-ordered)
//
// Both stores keep their collection in insertion order: events newest first,
// RSVPs oldest first. All data is lost when the process exits and re-seeded
// by `load()`.
//
// The stores accept whatever they are given. Validation, capacity and
// duplicate checks belong to the Deck.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DeckConfig;
use crate::error::{EventDeckError, Result};
use crate::event::Event;
use crate::input::{CreateEventInput, UpdateEventInput};
use crate::rsvp::{Rsvp, RsvpStatus};
use crate::seed::seed_events;
use crate::traits::EventSource;
use crate::user::{User, UserRole};

// ============================================================================
// EventStore
// ============================================================================

/// In-memory event collection
///
/// Clones share the same collection.
#[derive(Debug, Clone)]
pub struct EventStore {
    events: Arc<RwLock<Vec<Event>>>,
    loading: Arc<AtomicBool>,
    load_delay: Duration,
}

impl EventStore {
    /// Create an empty store in the loading state
    pub fn new(load_delay: Duration) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            loading: Arc::new(AtomicBool::new(true)),
            load_delay,
        }
    }

    pub fn from_config(config: &DeckConfig) -> Self {
        Self::new(config.event_load_delay())
    }

    /// Create an already loaded store holding `events` (useful for testing)
    pub fn with_events(events: Vec<Event>) -> Self {
        let store = Self::new(Duration::ZERO);
        store.seed(events);
        store
    }

    /// Replace the collection and mark the store loaded
    pub fn seed(&self, events: Vec<Event>) {
        *self.events.write() = events;
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Wait the configured delay, then replace the collection with the
    /// built-in seed events.
    pub async fn load(&self) -> Result<()> {
        debug!(delay_ms = self.load_delay.as_millis() as u64, "Loading events");
        tokio::time::sleep(self.load_delay).await;
        let events = seed_events()?;
        let count = events.len();
        self.seed(events);
        debug!(count, "Events loaded");
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Create an event from `input` and put it at the front of the collection.
    pub fn create(&self, input: CreateEventInput) -> Event {
        let event = input.into_event(Uuid::now_v7(), Utc::now());
        self.events.write().insert(0, event.clone());
        info!(event_id = %event.id, host_id = %event.host_id, "Event created");
        event
    }

    /// Merge `input` into the matching event. Returns `None` if absent.
    pub fn update(&self, id: Uuid, input: &UpdateEventInput) -> Option<Event> {
        let updated = self.modify(id, |event| input.apply_to(event));
        if updated.is_some() {
            info!(event_id = %id, "Event updated");
        }
        updated
    }

    /// Remove the matching event. Returns `false` if it was not there.
    /// RSVPs that reference the event are left untouched.
    pub fn delete(&self, id: Uuid) -> bool {
        let mut events = self.events.write();
        let before = events.len();
        events.retain(|e| e.id != id);
        let deleted = events.len() != before;
        if deleted {
            info!(event_id = %id, "Event deleted");
        }
        deleted
    }

    pub fn get(&self, id: Uuid) -> Option<Event> {
        self.events.read().iter().find(|e| e.id == id).cloned()
    }

    /// Current collection, newest first
    pub fn list(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Apply `f` to the matching event in place and return the result.
    pub(crate) fn modify<F>(&self, id: Uuid, f: F) -> Option<Event>
    where
        F: FnOnce(&mut Event),
    {
        let mut events = self.events.write();
        let event = events.iter_mut().find(|e| e.id == id)?;
        f(event);
        Some(event.clone())
    }
}

#[async_trait]
impl EventSource for EventStore {
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        Ok(self.get(event_id))
    }
}

// ============================================================================
// RsvpStore
// ============================================================================

/// In-memory RSVP collection
///
/// Resolves events through an injected [`EventSource`] so every RSVP
/// snapshots the event as it is at creation time. Clones share the same
/// collection.
#[derive(Clone)]
pub struct RsvpStore {
    rsvps: Arc<RwLock<Vec<Rsvp>>>,
    loading: Arc<AtomicBool>,
    load_delay: Duration,
    events: Arc<dyn EventSource>,
}

impl RsvpStore {
    /// Create an empty store in the loading state
    pub fn new(events: Arc<dyn EventSource>, load_delay: Duration) -> Self {
        Self {
            rsvps: Arc::new(RwLock::new(Vec::new())),
            loading: Arc::new(AtomicBool::new(true)),
            load_delay,
            events,
        }
    }

    pub fn from_config(events: Arc<dyn EventSource>, config: &DeckConfig) -> Self {
        Self::new(events, config.rsvp_load_delay())
    }

    /// Wait the configured delay, then reset to an empty collection.
    pub async fn load(&self) -> Result<()> {
        debug!(delay_ms = self.load_delay.as_millis() as u64, "Loading RSVPs");
        tokio::time::sleep(self.load_delay).await;
        self.rsvps.write().clear();
        self.loading.store(false, Ordering::SeqCst);
        debug!("RSVPs loaded");
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Create a confirmed RSVP for `user_id` against `event_id`.
    ///
    /// No capacity or duplicate check and no change to the event's
    /// attendance counter.
    pub async fn create(&self, event_id: Uuid, user_id: Uuid) -> Result<Rsvp> {
        self.create_with_status(event_id, user_id, RsvpStatus::Confirmed)
            .await
    }

    /// Create an RSVP with an explicit initial status.
    pub async fn create_with_status(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        status: RsvpStatus,
    ) -> Result<Rsvp> {
        let event = self
            .events
            .get_event(event_id)
            .await?
            .ok_or(EventDeckError::EventNotFound(event_id))?;

        let rsvp = Rsvp {
            id: Uuid::now_v7(),
            user_id,
            event_id,
            status,
            created_at: Utc::now(),
            user: User::stub(user_id, UserRole::Attendee),
            event,
            notes: None,
            dietary_restrictions: Vec::new(),
            plus_ones: None,
            payment_status: None,
        };
        self.rsvps.write().push(rsvp.clone());
        info!(rsvp_id = %rsvp.id, %event_id, %user_id, %status, "RSVP created");
        Ok(rsvp)
    }

    /// Set the status of the matching RSVP. Returns `None` if absent.
    pub fn update(&self, id: Uuid, status: RsvpStatus) -> Option<Rsvp> {
        let mut rsvps = self.rsvps.write();
        let rsvp = rsvps.iter_mut().find(|r| r.id == id)?;
        rsvp.status = status;
        info!(rsvp_id = %id, %status, "RSVP updated");
        Some(rsvp.clone())
    }

    pub fn get(&self, id: Uuid) -> Option<Rsvp> {
        self.rsvps.read().iter().find(|r| r.id == id).cloned()
    }

    /// First RSVP `user_id` holds for `event_id`, if any
    pub fn find(&self, user_id: Uuid, event_id: Uuid) -> Option<Rsvp> {
        self.rsvps
            .read()
            .iter()
            .find(|r| r.is_for(user_id, event_id))
            .cloned()
    }

    /// Current collection, oldest first
    pub fn list(&self) -> Vec<Rsvp> {
        self.rsvps.read().clone()
    }

    pub fn len(&self) -> usize {
        self.rsvps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsvps.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventStatus;
    use crate::seed::{SEED_EVENT_SUMMIT, SEED_HOST_JOHN};
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::HashSet;

    fn input(capacity: u32) -> CreateEventInput {
        CreateEventInput::new(
            SEED_HOST_JOHN,
            "Rust Meetup",
            "Talks and pizza",
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            "Community Hall, Berlin",
        )
        .with_capacity(capacity)
    }

    fn stores() -> (EventStore, RsvpStore) {
        let events = EventStore::with_events(Vec::new());
        let rsvps = RsvpStore::new(Arc::new(events.clone()), Duration::ZERO);
        (events, rsvps)
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_load_waits_then_seeds() {
        let store = EventStore::new(Duration::from_millis(1000));
        assert!(store.is_loading());
        assert!(store.is_empty());

        let start = tokio::time::Instant::now();
        store.load().await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(!store.is_loading());
        assert_eq!(store.len(), 3);
        assert_eq!(store.list()[0].id, SEED_EVENT_SUMMIT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rsvp_load_waits_then_empties() {
        let (events, _) = stores();
        let store = RsvpStore::new(Arc::new(events), Duration::from_millis(500));
        assert!(store.is_loading());

        let start = tokio::time::Instant::now();
        store.load().await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(500));
        assert!(!store.is_loading());
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_sets_store_fields_and_prepends() {
        let (store, _) = stores();
        let first = store.create(input(10));
        let second = store.create(input(20));

        assert_eq!(first.rsvp_count, 0);
        assert_eq!(first.status, EventStatus::Upcoming);
        assert_eq!(first.host.id, SEED_HOST_JOHN);

        let listed = store.list();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn test_created_ids_are_unique() {
        let (store, _) = stores();
        let ids: HashSet<Uuid> = (0..200).map(|_| store.create(input(5)).id).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_update_twice_equals_once() {
        let (store, _) = stores();
        let event = store.create(input(10));
        let update = UpdateEventInput {
            title: Some("Renamed".to_string()),
            capacity: Some(15),
            ..Default::default()
        };

        let once = store.update(event.id, &update).unwrap();
        let twice = store.update(event.id, &update).unwrap();
        assert_eq!(once, twice);
        assert_eq!(store.get(event.id).unwrap(), once);
    }

    #[test]
    fn test_update_missing_is_noop() {
        let (store, _) = stores();
        store.create(input(10));
        let before = store.list();
        assert!(store
            .update(Uuid::now_v7(), &UpdateEventInput::default())
            .is_none());
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_update_may_shrink_capacity_below_attendance() {
        let (store, _) = stores();
        let event = store.create(input(10));
        store.modify(event.id, |e| e.rsvp_count = 8);
        let update = UpdateEventInput {
            capacity: Some(2),
            ..Default::default()
        };
        let updated = store.update(event.id, &update).unwrap();
        assert_eq!((updated.capacity, updated.rsvp_count), (2, 8));
    }

    #[test]
    fn test_delete_twice_is_noop_second_time() {
        let (store, _) = stores();
        let keep = store.create(input(10));
        let gone = store.create(input(10));

        assert!(store.delete(gone.id));
        let after_first = store.list();
        assert!(!store.delete(gone.id));
        assert_eq!(store.list(), after_first);
        assert_eq!(after_first.len(), 1);
        assert_eq!(after_first[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_rsvp_create_snapshots_live_event() {
        let (events, rsvps) = stores();
        let event = events.create(input(10));

        let rsvp = rsvps.create(event.id, Uuid::now_v7()).await.unwrap();
        assert_eq!(rsvp.status, RsvpStatus::Confirmed);
        assert_eq!(rsvp.event.id, event.id);
        assert_eq!(rsvp.user.role, UserRole::Attendee);

        // Later edits do not reach the snapshot.
        events.update(
            event.id,
            &UpdateEventInput {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(rsvps.get(rsvp.id).unwrap().event.title, "Rust Meetup");
    }

    #[tokio::test]
    async fn test_rsvp_for_unknown_event_fails() {
        let (_, rsvps) = stores();
        let missing = Uuid::now_v7();
        let err = rsvps.create(missing, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, EventDeckError::EventNotFound(id) if id == missing));
        assert!(rsvps.is_empty());
    }

    #[tokio::test]
    async fn test_raw_stores_do_not_enforce_capacity() {
        let (events, rsvps) = stores();
        let event = events.create(input(1));

        let a = rsvps.create(event.id, Uuid::now_v7()).await.unwrap();
        let b = rsvps.create(event.id, Uuid::now_v7()).await.unwrap();

        assert_eq!(a.status, RsvpStatus::Confirmed);
        assert_eq!(b.status, RsvpStatus::Confirmed);
        assert_eq!(rsvps.len(), 2);
        assert_eq!(events.get(event.id).unwrap().rsvp_count, 0);
    }

    #[tokio::test]
    async fn test_raw_store_allows_duplicates() {
        let (events, rsvps) = stores();
        let event = events.create(input(10));
        let user = Uuid::now_v7();

        let first = rsvps.create(event.id, user).await.unwrap();
        let second = rsvps.create(event.id, user).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(rsvps.find(user, event.id).unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_rsvp_update_status() {
        let (events, rsvps) = stores();
        let event = events.create(input(10));
        let rsvp = rsvps.create(event.id, Uuid::now_v7()).await.unwrap();

        let updated = rsvps.update(rsvp.id, RsvpStatus::Declined).unwrap();
        assert_eq!(updated.status, RsvpStatus::Declined);
        assert!(rsvps.update(Uuid::now_v7(), RsvpStatus::Declined).is_none());
    }

    #[tokio::test]
    async fn test_deleting_event_keeps_rsvp_snapshot() {
        let (events, rsvps) = stores();
        let event = events.create(input(10));
        let rsvp = rsvps.create(event.id, Uuid::now_v7()).await.unwrap();

        events.delete(event.id);
        let kept = rsvps.get(rsvp.id).unwrap();
        assert_eq!(kept.event.id, event.id);
        assert_eq!(kept.event.title, "Rust Meetup");
    }
}
