// Deck configuration
//
// DeckConfig is a plain configuration struct that can be:
// - Created directly with defaults and builder-style setters
// - Read from environment variables (EVENTDECK_*)
// - Loaded from a YAML file

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{EventDeckError, Result};

/// What the deck does when a user RSVPs twice to the same event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateRsvpPolicy {
    /// Store another RSVP.
    #[default]
    Allow,
    /// Fail with `DuplicateRsvp`.
    Reject,
    /// Hand back the RSVP the user already has.
    ReturnExisting,
}

impl FromStr for DuplicateRsvpPolicy {
    type Err = EventDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            "return_existing" => Ok(Self::ReturnExisting),
            other => Err(EventDeckError::config(format!(
                "unknown duplicate RSVP policy: {other}"
            ))),
        }
    }
}

/// What the deck does when an RSVP arrives for a full event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverCapacityPolicy {
    /// Store the RSVP with status `waitlist`; attendance is unchanged.
    #[default]
    Waitlist,
    /// Fail with `EventFull`.
    Reject,
    /// Confirm anyway and let attendance exceed capacity.
    Allow,
}

impl FromStr for OverCapacityPolicy {
    type Err = EventDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "waitlist" => Ok(Self::Waitlist),
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            other => Err(EventDeckError::config(format!(
                "unknown over-capacity policy: {other}"
            ))),
        }
    }
}

/// Configuration for the stores and the deck
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeckConfig {
    /// Simulated latency of the event store load, in milliseconds
    #[serde(default = "default_event_load_delay_ms")]
    pub event_load_delay_ms: u64,

    /// Simulated latency of the RSVP store load, in milliseconds
    #[serde(default = "default_rsvp_load_delay_ms")]
    pub rsvp_load_delay_ms: u64,

    #[serde(default)]
    pub duplicate_rsvp: DuplicateRsvpPolicy,

    #[serde(default)]
    pub over_capacity: OverCapacityPolicy,

    /// Whether an edit may set capacity below the confirmed attendance
    #[serde(default = "default_allow_capacity_below_attendance")]
    pub allow_capacity_below_attendance: bool,
}

fn default_event_load_delay_ms() -> u64 {
    1000
}

fn default_rsvp_load_delay_ms() -> u64 {
    500
}

fn default_allow_capacity_below_attendance() -> bool {
    true
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            event_load_delay_ms: default_event_load_delay_ms(),
            rsvp_load_delay_ms: default_rsvp_load_delay_ms(),
            duplicate_rsvp: DuplicateRsvpPolicy::default(),
            over_capacity: OverCapacityPolicy::default(),
            allow_capacity_below_attendance: default_allow_capacity_below_attendance(),
        }
    }
}

impl DeckConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// Environment variables:
    /// - `EVENTDECK_EVENT_LOAD_DELAY_MS`: Event store load delay (default: 1000)
    /// - `EVENTDECK_RSVP_LOAD_DELAY_MS`: RSVP store load delay (default: 500)
    /// - `EVENTDECK_DUPLICATE_RSVP`: `allow`, `reject` or `return_existing`
    /// - `EVENTDECK_OVER_CAPACITY`: `waitlist`, `reject` or `allow`
    /// - `EVENTDECK_ALLOW_CAPACITY_BELOW_ATTENDANCE`: `true` or `false`
    ///   (`1`/`0`, `yes`/`no` and `on`/`off` also accepted)
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("EVENTDECK_EVENT_LOAD_DELAY_MS") {
            config.event_load_delay_ms = parse_ms("EVENTDECK_EVENT_LOAD_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("EVENTDECK_RSVP_LOAD_DELAY_MS") {
            config.rsvp_load_delay_ms = parse_ms("EVENTDECK_RSVP_LOAD_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("EVENTDECK_DUPLICATE_RSVP") {
            config.duplicate_rsvp = v.trim().to_lowercase().parse()?;
        }
        if let Some(v) = lookup("EVENTDECK_OVER_CAPACITY") {
            config.over_capacity = v.trim().to_lowercase().parse()?;
        }
        if let Some(v) = lookup("EVENTDECK_ALLOW_CAPACITY_BELOW_ATTENDANCE") {
            config.allow_capacity_below_attendance =
                parse_bool("EVENTDECK_ALLOW_CAPACITY_BELOW_ATTENDANCE", &v)?;
        }

        Ok(config)
    }

    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Skip the simulated load latency entirely
    pub fn without_delays(mut self) -> Self {
        self.event_load_delay_ms = 0;
        self.rsvp_load_delay_ms = 0;
        self
    }

    pub fn with_duplicate_rsvp(mut self, policy: DuplicateRsvpPolicy) -> Self {
        self.duplicate_rsvp = policy;
        self
    }

    pub fn with_over_capacity(mut self, policy: OverCapacityPolicy) -> Self {
        self.over_capacity = policy;
        self
    }

    pub fn with_capacity_below_attendance(mut self, allow: bool) -> Self {
        self.allow_capacity_below_attendance = allow;
        self
    }

    pub fn event_load_delay(&self) -> Duration {
        Duration::from_millis(self.event_load_delay_ms)
    }

    pub fn rsvp_load_delay(&self) -> Duration {
        Duration::from_millis(self.rsvp_load_delay_ms)
    }
}

fn parse_ms(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| EventDeckError::config(format!("{key} must be a number of milliseconds")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(EventDeckError::config(format!(
            "{key} must be true or false, got '{other}'"
        ))),
    }
}
