// CLI commands

pub mod browse;
pub mod dashboard;
pub mod demo;
pub mod manage;

use std::path::Path;

use anyhow::{Context, Result};
use eventdeck_core::{Deck, DeckConfig, Event};
use uuid::Uuid;

/// Resolve deck configuration from `--config` or the environment.
pub fn deck_config(path: Option<&Path>, no_delay: bool) -> Result<DeckConfig> {
    let config = match path {
        Some(path) => DeckConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DeckConfig::from_env().context("Failed to read configuration from environment")?,
    };
    Ok(if no_delay {
        config.without_delays()
    } else {
        config
    })
}

/// Build a deck and wait for both stores to load.
pub async fn load_deck(config: DeckConfig) -> Result<Deck> {
    let deck = Deck::new(config);
    deck.load().await.context("Failed to load event data")?;
    Ok(deck)
}

/// Look up an event or fail with a readable message.
pub fn require_event(deck: &Deck, event_id: Uuid) -> Result<Event> {
    deck.event(event_id)
        .with_context(|| format!("Event not found: {}", event_id))
}

/// "2027-03-15 09:00" style label
pub fn when(event: &Event) -> String {
    event.starts_at().format("%Y-%m-%d %H:%M").to_string()
}
