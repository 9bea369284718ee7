// Commands that go through the deck: create, rsvp

use crate::commands::when;
use crate::output::{print_field, OutputFormat};
use anyhow::{Context, Result};
use eventdeck_core::{
    Availability, Command, CommandOutcome, CreateEventInput, Deck, EventDeckError,
};
use uuid::Uuid;

pub async fn create(
    deck: &Deck,
    output: OutputFormat,
    quiet: bool,
    input: CreateEventInput,
) -> Result<()> {
    let outcome = match deck.execute(Command::CreateEvent(input)).await {
        Ok(outcome) => outcome,
        Err(EventDeckError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field, message);
            }
            anyhow::bail!("Event is invalid ({} problem(s))", errors.len());
        }
        Err(e) => return Err(e).context("Failed to create event"),
    };
    let CommandOutcome::EventCreated(event) = outcome else {
        anyhow::bail!("Unexpected outcome from create");
    };

    if output.is_text() {
        if quiet {
            println!("{}", event.id);
        } else {
            println!("Created event: {}", event.id);
            print_field("Title", &event.title);
            print_field("When", &when(&event));
            print_field("Capacity", &event.capacity.to_string());
            if !event.is_public {
                print_field("Visibility", "private");
            }
        }
        Ok(())
    } else {
        output.print_value(&event)
    }
}

pub async fn rsvp(
    deck: &Deck,
    output: OutputFormat,
    quiet: bool,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<()> {
    let outcome = deck
        .execute(Command::Rsvp { event_id, user_id })
        .await
        .with_context(|| format!("Failed to RSVP to {}", event_id))?;
    let CommandOutcome::RsvpRecorded(receipt) = outcome else {
        anyhow::bail!("Unexpected outcome from rsvp");
    };

    if !output.is_text() {
        return output.print_value(&receipt);
    }

    if quiet {
        println!("{}", receipt.rsvp.id);
        return Ok(());
    }

    let verb = if receipt.created { "Recorded" } else { "Existing" };
    println!("{} RSVP: {}", verb, receipt.rsvp.id);
    print_field("Event", &receipt.rsvp.event.title);
    print_field("User", &user_id.to_string());
    print_field("Status", &receipt.rsvp.status.to_string());
    if let Some(event) = &receipt.event {
        let availability = Availability::of(event);
        print_field(
            "Attendance",
            &format!("{}/{}", event.rsvp_count, event.capacity),
        );
        print_field("Availability", &availability.tier.to_string());
    }
    Ok(())
}
