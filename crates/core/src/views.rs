// Derived views
//
// Pure functions over event and RSVP collections. Nothing here is cached;
// callers recompute on every read.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EventDeckError;
use crate::event::Event;
use crate::rsvp::Rsvp;

/// Sentinel meaning "no filter" for category and location.
pub const ALL: &str = "all";

/// Number of leading browse results shown as featured.
pub const FEATURED_COUNT: usize = 3;

/// Number of upcoming events shown on the dashboard.
pub const DASHBOARD_UPCOMING: usize = 3;

/// Spots-left threshold at or below which an event is almost full.
pub const ALMOST_FULL_THRESHOLD: i64 = 10;

/// Fixed category catalogue offered by the create form and the browse filter.
pub const CATEGORIES: [&str; 12] = [
    "Technology",
    "Business",
    "Health",
    "Education",
    "Arts",
    "Sports",
    "Music",
    "Food",
    "Travel",
    "Networking",
    "Workshop",
    "Conference",
];

// ============================================================================
// Browse filter and sort
// ============================================================================

/// Filter criteria for public browsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowseFilter {
    /// Case-insensitive substring of title, description or location
    #[serde(default)]
    pub search: String,
    /// Exact category, or `all`
    #[serde(default = "all")]
    pub category: String,
    /// Substring of location, or `all`
    #[serde(default = "all")]
    pub location: String,
}

fn all() -> String {
    ALL.to_string()
}

impl Default for BrowseFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: all(),
            location: all(),
        }
    }
}

impl BrowseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Whether `event` passes every criterion, including the public check.
    pub fn matches(&self, event: &Event) -> bool {
        if !event.is_public {
            return false;
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = event.title.to_lowercase().contains(&needle)
                || event.description.to_lowercase().contains(&needle)
                || event.location.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if self.category != ALL && event.category != self.category {
            return false;
        }
        if self.location != ALL && !event.location.contains(&self.location) {
            return false;
        }
        true
    }

    /// Matching events in their original relative order.
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// Ordering for browse results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Earliest date first
    #[default]
    Date,
    /// Most RSVPs first
    Popularity,
    /// Largest capacity first
    Capacity,
}

impl SortKey {
    pub fn sort(&self, events: &mut [Event]) {
        match self {
            SortKey::Date => events.sort_by(|a, b| a.date.cmp(&b.date)),
            SortKey::Popularity => events.sort_by(|a, b| b.rsvp_count.cmp(&a.rsvp_count)),
            SortKey::Capacity => events.sort_by(|a, b| b.capacity.cmp(&a.capacity)),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Date => write!(f, "date"),
            SortKey::Popularity => write!(f, "popularity"),
            SortKey::Capacity => write!(f, "capacity"),
        }
    }
}

impl FromStr for SortKey {
    type Err = EventDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "popularity" => Ok(SortKey::Popularity),
            "capacity" => Ok(SortKey::Capacity),
            other => Err(EventDeckError::config(format!("unknown sort key: {other}"))),
        }
    }
}

/// Filter then sort.
pub fn browse(events: &[Event], filter: &BrowseFilter, sort: SortKey) -> Vec<Event> {
    let mut result = filter.apply(events);
    sort.sort(&mut result);
    result
}

/// Browse results split by position.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeaturedSplit {
    pub featured: Vec<Event>,
    pub regular: Vec<Event>,
}

/// First [`FEATURED_COUNT`] events are featured, the rest regular.
pub fn split_featured(mut events: Vec<Event>) -> FeaturedSplit {
    let regular = events.split_off(events.len().min(FEATURED_COUNT));
    FeaturedSplit {
        featured: events,
        regular,
    }
}

/// Location filter options: `all`, then the distinct last comma-separated
/// segment of each location in first-seen order.
pub fn location_options(events: &[Event]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = vec![all()];
    for event in events {
        let tail = event
            .location
            .rsplit(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown");
        if seen.insert(tail.to_string()) {
            options.push(tail.to_string());
        }
    }
    options
}

/// Category filter options: `all` followed by the catalogue.
pub fn category_options() -> Vec<String> {
    std::iter::once(ALL)
        .chain(CATEGORIES)
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Host dashboard
// ============================================================================

/// Events owned by `host_id`, in collection order.
pub fn hosted_by(events: &[Event], host_id: Uuid) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.is_hosted_by(host_id))
        .cloned()
        .collect()
}

/// First `limit` events dated after `today`, in collection order.
pub fn upcoming(events: &[Event], today: NaiveDate, limit: usize) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.is_after(today))
        .take(limit)
        .cloned()
        .collect()
}

/// Aggregate numbers for a host's dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostStats {
    pub total_events: usize,
    pub total_attendees: u64,
    /// Mean attendance, rounded; 0 with no events
    pub average_attendance: u64,
    /// Events dated after today
    pub active_events: usize,
}

impl HostStats {
    pub fn compute(events: &[Event], host_id: Uuid, today: NaiveDate) -> Self {
        let mine: Vec<&Event> = events.iter().filter(|e| e.is_hosted_by(host_id)).collect();
        let total_events = mine.len();
        let total_attendees: u64 = mine.iter().map(|e| u64::from(e.rsvp_count)).sum();
        let average_attendance = if total_events == 0 {
            0
        } else {
            (total_attendees as f64 / total_events as f64).round() as u64
        };
        let active_events = mine.iter().filter(|e| e.is_after(today)).count();

        Self {
            total_events,
            total_attendees,
            average_attendance,
            active_events,
        }
    }
}

// ============================================================================
// Availability
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityTier {
    SoldOut,
    AlmostFull,
    Available,
}

impl std::fmt::Display for AvailabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityTier::SoldOut => write!(f, "Sold Out"),
            AvailabilityTier::AlmostFull => write!(f, "Almost Full"),
            AvailabilityTier::Available => write!(f, "Available"),
        }
    }
}

/// Seats left on an event and its tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Availability {
    /// `capacity - rsvp_count`; negative when overbooked
    pub spots_left: i64,
    pub tier: AvailabilityTier,
}

impl Availability {
    pub fn of(event: &Event) -> Self {
        Self::from_counts(event.capacity, event.rsvp_count)
    }

    pub fn from_counts(capacity: u32, rsvp_count: u32) -> Self {
        let spots_left = i64::from(capacity) - i64::from(rsvp_count);
        let tier = if spots_left <= 0 {
            AvailabilityTier::SoldOut
        } else if spots_left <= ALMOST_FULL_THRESHOLD {
            AvailabilityTier::AlmostFull
        } else {
            AvailabilityTier::Available
        };
        Self { spots_left, tier }
    }

    pub fn is_sold_out(&self) -> bool {
        self.tier == AvailabilityTier::SoldOut
    }
}

/// Attendance as a percentage of capacity, capped at 100.
pub fn fill_percent(event: &Event) -> f64 {
    if event.capacity == 0 {
        return 100.0;
    }
    (f64::from(event.rsvp_count) / f64::from(event.capacity) * 100.0).min(100.0)
}

// ============================================================================
// RSVP projections
// ============================================================================

pub fn rsvps_for_user(rsvps: &[Rsvp], user_id: Uuid) -> Vec<Rsvp> {
    rsvps
        .iter()
        .filter(|r| r.user_id == user_id)
        .cloned()
        .collect()
}

pub fn rsvps_for_event(rsvps: &[Rsvp], event_id: Uuid) -> Vec<Rsvp> {
    rsvps
        .iter()
        .filter(|r| r.event_id == event_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CreateEventInput;
    use crate::seed::{seed_events, SEED_HOST_JOHN, SEED_HOST_SARAH};
    use chrono::{NaiveTime, Utc};

    fn event(title: &str, date: (i32, u32, u32), rsvp_count: u32, capacity: u32) -> Event {
        let mut e = CreateEventInput::new(
            SEED_HOST_JOHN,
            title,
            format!("About {title}"),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            "Main Hall, Berlin",
        )
        .with_capacity(capacity)
        .into_event(Uuid::now_v7(), Utc::now());
        e.rsvp_count = rsvp_count;
        e
    }

    fn titles(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_default_filter_keeps_public_in_order() {
        let mut events = vec![
            event("A", (2030, 1, 3), 0, 10),
            event("B", (2030, 1, 1), 0, 10),
            event("C", (2030, 1, 2), 0, 10),
        ];
        events[1].is_public = false;

        let filtered = BrowseFilter::default().apply(&events);
        assert_eq!(titles(&filtered), vec!["A", "C"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut events = vec![
            event("Rust Meetup", (2030, 1, 1), 0, 10),
            event("Yoga", (2030, 1, 1), 0, 10),
            event("Painting", (2030, 1, 1), 0, 10),
        ];
        events[1].description = "Bring a RUST-coloured mat".to_string();
        events[2].location = "Trust Building".to_string();

        let filter = BrowseFilter::new().with_search("rust");
        assert_eq!(titles(&filter.apply(&events)), vec!["Rust Meetup", "Yoga", "Painting"]);

        let filter = BrowseFilter::new().with_search("MEETUP");
        assert_eq!(titles(&filter.apply(&events)), vec!["Rust Meetup"]);
    }

    #[test]
    fn test_category_is_exact_and_location_is_substring() {
        let mut events = vec![
            event("A", (2030, 1, 1), 0, 10),
            event("B", (2030, 1, 1), 0, 10),
        ];
        events[1].category = "Music".to_string();
        events[1].location = "Warehouse, Austin".to_string();

        let by_category = BrowseFilter::new().with_category("music");
        assert!(by_category.apply(&events).is_empty());
        let by_category = BrowseFilter::new().with_category("Music");
        assert_eq!(titles(&by_category.apply(&events)), vec!["B"]);

        let by_location = BrowseFilter::new().with_location("Austin");
        assert_eq!(titles(&by_location.apply(&events)), vec!["B"]);
    }

    #[test]
    fn test_sort_by_popularity() {
        let events = vec![
            event("ten", (2030, 1, 1), 10, 100),
            event("fifty", (2030, 1, 1), 50, 100),
            event("five", (2030, 1, 1), 5, 100),
        ];
        let sorted = browse(&events, &BrowseFilter::default(), SortKey::Popularity);
        let counts: Vec<u32> = sorted.iter().map(|e| e.rsvp_count).collect();
        assert_eq!(counts, vec![50, 10, 5]);
    }

    #[test]
    fn test_sort_by_date_and_capacity() {
        let events = vec![
            event("late", (2030, 3, 1), 0, 20),
            event("early", (2030, 1, 1), 0, 10),
            event("mid", (2030, 2, 1), 0, 30),
        ];
        let by_date = browse(&events, &BrowseFilter::default(), SortKey::Date);
        assert_eq!(titles(&by_date), vec!["early", "mid", "late"]);

        let by_capacity = browse(&events, &BrowseFilter::default(), SortKey::Capacity);
        assert_eq!(titles(&by_capacity), vec!["mid", "late", "early"]);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("popularity".parse::<SortKey>().unwrap(), SortKey::Popularity);
        assert_eq!(SortKey::Capacity.to_string(), "capacity");
        assert!("rating".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_featured_split() {
        let events: Vec<Event> = (1..=5)
            .map(|d| event(&format!("E{d}"), (2030, 1, d), 0, 10))
            .collect();
        let split = split_featured(events);
        assert_eq!(titles(&split.featured), vec!["E1", "E2", "E3"]);
        assert_eq!(titles(&split.regular), vec!["E4", "E5"]);

        let short = split_featured(vec![event("only", (2030, 1, 1), 0, 10)]);
        assert_eq!(short.featured.len(), 1);
        assert!(short.regular.is_empty());
    }

    #[test]
    fn test_location_options_use_last_segment() {
        let events = seed_events().unwrap();
        assert_eq!(
            location_options(&events),
            vec![
                "all".to_string(),
                "San Francisco Convention Center".to_string(),
                "Online Webinar".to_string(),
                "Austin".to_string(),
            ]
        );
    }

    #[test]
    fn test_location_options_dedupe_and_unknown() {
        let mut events = vec![
            event("A", (2030, 1, 1), 0, 10),
            event("B", (2030, 1, 1), 0, 10),
            event("C", (2030, 1, 1), 0, 10),
        ];
        events[2].location = "Somewhere, ".to_string();
        assert_eq!(location_options(&events), vec!["all", "Berlin", "Unknown"]);
    }

    #[test]
    fn test_category_options() {
        let options = category_options();
        assert_eq!(options.len(), 13);
        assert_eq!(options[0], "all");
        assert_eq!(options[1], "Technology");
    }

    #[test]
    fn test_host_stats() {
        let today = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
        let mut events = vec![
            event("past", (2030, 1, 1), 10, 100),
            event("future", (2030, 2, 1), 15, 100),
            event("today", (2030, 1, 15), 0, 100),
            event("other host", (2030, 2, 1), 99, 100),
        ];
        events[3].host_id = SEED_HOST_SARAH;

        let stats = HostStats::compute(&events, SEED_HOST_JOHN, today);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.total_attendees, 25);
        // 25 / 3 = 8.33 -> 8
        assert_eq!(stats.average_attendance, 8);
        assert_eq!(stats.active_events, 1);
    }

    #[test]
    fn test_host_stats_rounds_half_up_and_handles_empty() {
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let events = vec![
            event("a", (2030, 2, 1), 2, 10),
            event("b", (2030, 2, 1), 3, 10),
        ];
        assert_eq!(
            HostStats::compute(&events, SEED_HOST_JOHN, today).average_attendance,
            3
        );
        assert_eq!(
            HostStats::compute(&events, SEED_HOST_SARAH, today),
            HostStats::default()
        );
    }

    #[test]
    fn test_upcoming_and_hosted_by() {
        let today = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
        let mut events: Vec<Event> = (10..=20)
            .map(|d| event(&format!("D{d}"), (2030, 1, d), 0, 10))
            .collect();
        events[0].host_id = SEED_HOST_SARAH;

        assert_eq!(
            titles(&upcoming(&events, today, DASHBOARD_UPCOMING)),
            vec!["D16", "D17", "D18"]
        );
        assert_eq!(hosted_by(&events, SEED_HOST_SARAH).len(), 1);
        assert_eq!(hosted_by(&events, SEED_HOST_JOHN).len(), 10);
    }

    #[test]
    fn test_availability_tiers() {
        assert_eq!(
            Availability::from_counts(20, 20).tier,
            AvailabilityTier::SoldOut
        );
        assert_eq!(
            Availability::from_counts(20, 15).tier,
            AvailabilityTier::AlmostFull
        );
        assert_eq!(
            Availability::from_counts(20, 5).tier,
            AvailabilityTier::Available
        );
        assert_eq!(
            Availability::from_counts(20, 10).tier,
            AvailabilityTier::AlmostFull
        );
        assert_eq!(
            Availability::from_counts(21, 10).tier,
            AvailabilityTier::Available
        );
    }

    #[test]
    fn test_availability_overbooked() {
        let availability = Availability::from_counts(5, 8);
        assert_eq!(availability.spots_left, -3);
        assert!(availability.is_sold_out());
    }

    #[test]
    fn test_fill_percent_caps_at_100() {
        assert_eq!(fill_percent(&event("half", (2030, 1, 1), 10, 20)), 50.0);
        assert_eq!(fill_percent(&event("over", (2030, 1, 1), 30, 20)), 100.0);
    }
}
