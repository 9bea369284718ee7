// Scripted capacity scenario
//
// Creates a small event, lets more attendees RSVP than there are seats,
// then has the first attendee decline so the waitlist moves up.

use std::sync::Arc;

use crate::output::{print_heading, print_table_header, print_table_row, OutputFormat};
use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveTime};
use eventdeck_core::seed::SEED_HOST_JOHN;
use eventdeck_core::views::{self, Availability};
use eventdeck_core::{
    Command, CommandOutcome, CreateEventInput, Deck, DeckConfig, Event, InMemoryNotificationSink,
    Notification, Rsvp, RsvpStatus,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct Step {
    action: String,
    event: Event,
    rsvps: Vec<Rsvp>,
}

#[derive(Debug, Serialize)]
struct DemoReport {
    config: DeckConfig,
    steps: Vec<Step>,
    notifications: Vec<Notification>,
}

pub async fn run(
    config: DeckConfig,
    output: OutputFormat,
    capacity: u32,
    attendees: usize,
) -> Result<()> {
    let sink = InMemoryNotificationSink::new();
    let deck = Deck::new(config.clone()).with_notification_sink(Arc::new(sink.clone()));
    deck.load().await.context("Failed to load event data")?;

    let date = Local::now()
        .date_naive()
        .checked_add_days(Days::new(30))
        .context("Date out of range")?;
    let time = NaiveTime::from_hms_opt(18, 0, 0).context("Invalid time")?;
    let input = CreateEventInput::new(
        SEED_HOST_JOHN,
        "Capacity Demo Meetup",
        "A small room to show how the waitlist behaves",
        date,
        time,
        "Demo Room, Online",
    )
    .with_category("Networking")
    .with_capacity(capacity);

    let CommandOutcome::EventCreated(event) = deck.execute(Command::CreateEvent(input)).await?
    else {
        anyhow::bail!("Unexpected outcome from create");
    };
    info!(event_id = %event.id, capacity, attendees, "Demo event created");

    let mut steps = vec![snapshot(
        &deck,
        event.id,
        format!("Created event with {capacity} seats"),
    )?];

    let mut first_rsvp = None;
    for n in 1..=attendees {
        let user_id = Uuid::now_v7();
        let outcome = deck.execute(Command::Rsvp {
            event_id: event.id,
            user_id,
        });
        match outcome.await {
            Ok(CommandOutcome::RsvpRecorded(receipt)) => {
                if first_rsvp.is_none() {
                    first_rsvp = Some(receipt.rsvp.id);
                }
                steps.push(snapshot(
                    &deck,
                    event.id,
                    format!("Attendee {n} RSVPs -> {}", receipt.rsvp.status),
                )?);
            }
            Ok(_) => anyhow::bail!("Unexpected outcome from rsvp"),
            Err(e) => {
                steps.push(snapshot(&deck, event.id, format!("Attendee {n} rejected: {e}"))?);
            }
        }
    }

    if let Some(rsvp_id) = first_rsvp {
        deck.execute(Command::SetRsvpStatus {
            rsvp_id,
            status: RsvpStatus::Declined,
        })
        .await?;
        steps.push(snapshot(&deck, event.id, "Attendee 1 declines".to_string())?);
    }

    let report = DemoReport {
        config,
        steps,
        notifications: sink.notifications(),
    };

    if !output.is_text() {
        return output.print_value(&report);
    }

    for step in &report.steps {
        let availability = Availability::of(&step.event);
        print_heading(&step.action);
        println!(
            "{}/{} seats taken - {}",
            step.event.rsvp_count, step.event.capacity, availability.tier
        );
        if !step.rsvps.is_empty() {
            print_table_header(&[("RSVP", 36), ("USER", 36), ("STATUS", 10)]);
            for rsvp in &step.rsvps {
                print_table_row(&[
                    (&rsvp.id.to_string(), 36),
                    (&rsvp.user_id.to_string(), 36),
                    (&rsvp.status.to_string(), 10),
                ]);
            }
        }
    }

    print_heading("Notifications");
    for notification in &report.notifications {
        println!("[{}] {}: {}", notification.kind, notification.title, notification.message);
    }

    Ok(())
}

fn snapshot(deck: &Deck, event_id: Uuid, action: String) -> Result<Step> {
    let event = super::require_event(deck, event_id)?;
    Ok(Step {
        action,
        event,
        rsvps: views::rsvps_for_event(&deck.rsvps(), event_id),
    })
}
