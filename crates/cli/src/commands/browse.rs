// Public browsing commands: browse, show, categories, locations

use crate::commands::{require_event, when};
use crate::output::{print_field, print_heading, print_table_header, print_table_row, OutputFormat};
use anyhow::Result;
use eventdeck_core::views::{self, fill_percent, Availability, BrowseFilter, SortKey};
use eventdeck_core::{Deck, Event};
use serde::Serialize;
use uuid::Uuid;

/// Event row with its availability, as shown in listings
#[derive(Debug, Serialize)]
struct Listing<'a> {
    #[serde(flatten)]
    event: &'a Event,
    availability: Availability,
}

#[derive(Debug, Serialize)]
struct BrowseResult<'a> {
    filter: &'a BrowseFilter,
    sort: String,
    featured: Vec<Listing<'a>>,
    regular: Vec<Listing<'a>>,
}

fn listing(event: &Event) -> Listing<'_> {
    Listing {
        event,
        availability: Availability::of(event),
    }
}

pub fn run(
    deck: &Deck,
    output: OutputFormat,
    search: String,
    category: String,
    location: String,
    sort: &str,
) -> Result<()> {
    let sort: SortKey = sort.parse()?;
    let filter = BrowseFilter::new()
        .with_search(search)
        .with_category(category)
        .with_location(location);

    let events = deck.events();
    let split = views::split_featured(views::browse(&events, &filter, sort));

    if !output.is_text() {
        return output.print_value(&BrowseResult {
            filter: &filter,
            sort: sort.to_string(),
            featured: split.featured.iter().map(listing).collect(),
            regular: split.regular.iter().map(listing).collect(),
        });
    }

    if split.featured.is_empty() {
        println!("No events found");
        return Ok(());
    }

    print_heading("Featured Events");
    print_events(&split.featured);

    if !split.regular.is_empty() {
        print_heading("All Events");
        print_events(&split.regular);
    }

    Ok(())
}

fn print_events(events: &[Event]) {
    print_table_header(&[
        ("ID", 36),
        ("TITLE", 28),
        ("WHEN", 16),
        ("LOCATION", 24),
        ("CATEGORY", 12),
        ("SPOTS", 12),
    ]);
    for event in events {
        let availability = Availability::of(event);
        let spots = if availability.is_sold_out() {
            availability.tier.to_string()
        } else {
            format!("{} left", availability.spots_left)
        };
        print_table_row(&[
            (&event.id.to_string(), 36),
            (&event.title, 28),
            (&when(event), 16),
            (&event.location, 24),
            (&event.category, 12),
            (&spots, 12),
        ]);
    }
}

pub fn show(deck: &Deck, output: OutputFormat, event_id: Uuid) -> Result<()> {
    let event = require_event(deck, event_id)?;

    if !output.is_text() {
        return output.print_value(&listing(&event));
    }

    let availability = Availability::of(&event);
    print_field("ID", &event.id.to_string());
    print_field("Title", &event.title);
    print_field("Description", &event.description);
    print_field("When", &when(&event));
    if let Some(end_time) = event.end_time {
        print_field("Ends", &end_time.format("%H:%M").to_string());
    }
    print_field("Location", &event.location);
    print_field("Category", &event.category);
    if !event.tags.is_empty() {
        print_field("Tags", &event.tags.join(", "));
    }
    print_field("Host", &format!("{} <{}>", event.host.name, event.host.email));
    print_field("Status", &event.status.to_string());
    print_field(
        "Attendance",
        &format!(
            "{}/{} ({:.0}%)",
            event.rsvp_count,
            event.capacity,
            fill_percent(&event)
        ),
    );
    print_field(
        "Availability",
        &format!("{} ({} spots left)", availability.tier, availability.spots_left.max(0)),
    );
    if !event.is_public {
        print_field("Visibility", "private");
    }

    Ok(())
}

pub fn categories(output: OutputFormat) -> Result<()> {
    let options = views::category_options();
    if output.is_text() {
        for option in &options {
            println!("{}", option);
        }
        Ok(())
    } else {
        output.print_value(&options)
    }
}

pub fn locations(deck: &Deck, output: OutputFormat) -> Result<()> {
    let options = views::location_options(&deck.events());
    if output.is_text() {
        for option in &options {
            println!("{}", option);
        }
        Ok(())
    } else {
        output.print_value(&options)
    }
}
