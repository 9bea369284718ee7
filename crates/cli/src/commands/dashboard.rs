// Host dashboard command

use crate::commands::when;
use crate::output::{print_field, print_heading, print_table_header, print_table_row, OutputFormat};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use eventdeck_core::views::{self, fill_percent, HostStats, DASHBOARD_UPCOMING};
use eventdeck_core::{Deck, Event};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct Dashboard {
    host_id: Uuid,
    today: NaiveDate,
    stats: HostStats,
    upcoming: Vec<Event>,
    events: Vec<Event>,
}

impl Dashboard {
    /// Stats and "My Events" cover the host's own events; the upcoming
    /// list is drawn from every event.
    fn build(events: &[Event], host: Uuid, today: NaiveDate) -> Self {
        Self {
            host_id: host,
            today,
            stats: HostStats::compute(events, host, today),
            upcoming: views::upcoming(events, today, DASHBOARD_UPCOMING),
            events: views::hosted_by(events, host),
        }
    }
}

pub fn run(deck: &Deck, output: OutputFormat, host: Uuid, today: Option<NaiveDate>) -> Result<()> {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let dashboard = Dashboard::build(&deck.events(), host, today);

    if !output.is_text() {
        return output.print_value(&dashboard);
    }

    let stats = &dashboard.stats;
    print_field("Host", &host.to_string());
    print_field("Events", &stats.total_events.to_string());
    print_field("Attendees", &stats.total_attendees.to_string());
    print_field("Avg attendance", &stats.average_attendance.to_string());
    print_field("Active", &stats.active_events.to_string());

    if dashboard.events.is_empty() {
        println!();
        println!("No events yet");
        return Ok(());
    }

    print_heading("Upcoming");
    if dashboard.upcoming.is_empty() {
        println!("Nothing scheduled after {}", today);
    }
    for event in &dashboard.upcoming {
        println!("{}  {}  ({} attending)", when(event), event.title, event.rsvp_count);
    }

    print_heading("My Events");
    print_table_header(&[("ID", 36), ("TITLE", 28), ("WHEN", 16), ("FILLED", 14)]);
    for event in &dashboard.events {
        let filled = format!(
            "{}/{} {:.0}%",
            event.rsvp_count,
            event.capacity,
            fill_percent(event)
        );
        print_table_row(&[
            (&event.id.to_string(), 36),
            (&event.title, 28),
            (&when(event), 16),
            (&filled, 14),
        ]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdeck_core::seed::{seed_events, SEED_EVENT_NETWORKING, SEED_HOST_SARAH};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_upcoming_includes_other_hosts_events() {
        let events = seed_events().unwrap();
        let dashboard = Dashboard::build(&events, SEED_HOST_SARAH, today());

        assert_eq!(dashboard.events.len(), 1);
        assert_eq!(dashboard.events[0].id, SEED_EVENT_NETWORKING);
        assert_eq!(dashboard.stats.total_events, 1);
        assert_eq!(dashboard.upcoming.len(), 3);
        assert!(dashboard
            .upcoming
            .iter()
            .any(|e| e.host_id != SEED_HOST_SARAH));
    }

    #[test]
    fn test_upcoming_skips_past_events() {
        let events = seed_events().unwrap();
        let later = NaiveDate::from_ymd_opt(2027, 2, 28).unwrap();
        let dashboard = Dashboard::build(&events, SEED_HOST_SARAH, later);

        assert_eq!(dashboard.upcoming.len(), 1);
        assert!(dashboard.upcoming[0].host_id != SEED_HOST_SARAH);
        assert_eq!(dashboard.events.len(), 1);
    }
}
