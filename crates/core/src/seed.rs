// Mock seed data
//
// The event store is populated from this fixed set on every load. The data
// is embedded in the binary so no file access is needed at runtime.

use anyhow::Context;
use uuid::Uuid;

use crate::error::Result;
use crate::event::Event;

/// Built-in seed events (embedded in binary)
const SEED_EVENTS: &str = include_str!("../seed/events.yaml");

/// Host of the first two seed events.
pub const SEED_HOST_JOHN: Uuid = Uuid::from_u128(0x1);
/// Host of the third seed event.
pub const SEED_HOST_SARAH: Uuid = Uuid::from_u128(0x2);

pub const SEED_EVENT_SUMMIT: Uuid = Uuid::from_u128(0x101);
pub const SEED_EVENT_WORKSHOP: Uuid = Uuid::from_u128(0x102);
pub const SEED_EVENT_NETWORKING: Uuid = Uuid::from_u128(0x103);

/// Parse the built-in seed events.
pub fn seed_events() -> Result<Vec<Event>> {
    let events: Vec<Event> =
        serde_yaml::from_str(SEED_EVENTS).context("Failed to parse built-in seed events")?;
    Ok(events)
}
