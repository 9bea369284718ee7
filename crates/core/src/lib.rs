// Event Deck Core
//
// This crate holds the client-side state of an event discovery and RSVP
// application: an event collection seeded from mock data, an RSVP
// collection, derived views for browsing and dashboards, and a command
// interface that keeps both collections consistent.
//
// Key design decisions:
// - Stores are in-memory, shared via Arc, and simulate load latency
// - The RSVP store reads live event state through the EventSource trait
// - The Deck serialises commands and owns attendance counters
// - Duplicate and over-capacity behaviour is policy-driven (DeckConfig)
// - Views are pure functions over snapshots; nothing here renders UI
// - Error handling distinguishes user-facing rejections from internal faults

// Domain entity types
pub mod event;
pub mod notification;
pub mod rsvp;
pub mod user;

// Payloads and validation
pub mod input;

pub mod config;
pub mod error;
pub mod seed;
pub mod traits;

// State
pub mod deck;
pub mod store;

// Derived read models
pub mod views;

// Logging setup
pub mod telemetry;

// Re-exports for convenience
pub use config::{DeckConfig, DuplicateRsvpPolicy, OverCapacityPolicy};
pub use deck::{Command, CommandOutcome, Deck, RsvpReceipt};
pub use error::{EventDeckError, Result, ValidationErrors};
pub use event::{Event, EventStatus};
pub use input::{CreateEventInput, UpdateEventInput};
pub use notification::{
    InMemoryNotificationSink, NoOpNotificationSink, Notification, NotificationKind,
};
pub use rsvp::{Rsvp, RsvpStatus};
pub use store::{EventStore, RsvpStore};
pub use traits::{EventSource, NotificationSink};
pub use user::{User, UserRole};
pub use views::{Availability, AvailabilityTier, BrowseFilter, HostStats, SortKey};
