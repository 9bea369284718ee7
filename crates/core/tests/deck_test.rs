// Integration tests for the Deck and derived views
//
// These tests drive the public API the way a front end would: load, browse,
// create, RSVP and read the dashboard, all against in-memory state.
//
// Run with: cargo test -p eventdeck-core --test deck_test

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use eventdeck_core::seed::{SEED_EVENT_WORKSHOP, SEED_HOST_JOHN, SEED_HOST_SARAH};
use eventdeck_core::views::{self, FEATURED_COUNT};
use eventdeck_core::{
    Availability, AvailabilityTier, BrowseFilter, Command, CommandOutcome, CreateEventInput, Deck,
    DeckConfig, EventDeckError, EventStatus, EventStore, HostStats, InMemoryNotificationSink,
    NotificationKind, RsvpStatus, RsvpStore, SortKey, UpdateEventInput,
};
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// Payload far enough ahead that the wall clock never catches up
fn future_event(host_id: Uuid, capacity: u32) -> CreateEventInput {
    CreateEventInput::new(
        host_id,
        "Launch Party",
        "Celebrating the 1.0 release",
        NaiveDate::from_ymd_opt(2099, 6, 1).unwrap(),
        NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
        "Rooftop Bar, Lisbon",
    )
    .with_category("Networking")
    .with_capacity(capacity)
}

async fn loaded_deck() -> (Deck, InMemoryNotificationSink) {
    let sink = InMemoryNotificationSink::new();
    let deck = Deck::new(DeckConfig::default().without_delays())
        .with_notification_sink(Arc::new(sink.clone()));
    deck.load().await.unwrap();
    (deck, sink)
}

async fn create(deck: &Deck, input: CreateEventInput) -> Uuid {
    match deck.execute(Command::CreateEvent(input)).await.unwrap() {
        CommandOutcome::EventCreated(event) => event.id,
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_stores_load_with_default_delays() {
    let events = EventStore::from_config(&DeckConfig::default());
    let rsvps = RsvpStore::from_config(Arc::new(events.clone()), &DeckConfig::default());
    assert!(events.is_loading() && rsvps.is_loading());

    let start = tokio::time::Instant::now();
    rsvps.load().await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(500));
    assert!(events.is_loading());

    events.load().await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
    assert!(!events.is_loading());
    assert_eq!(events.len(), 3);
}

#[tokio::test]
async fn test_browse_seed_events() {
    let (deck, _) = loaded_deck().await;
    let events = deck.events();

    // Empty filter keeps every public event in collection order.
    let all = BrowseFilter::default().apply(&events);
    assert_eq!(all, events);

    let by_date = views::browse(&events, &BrowseFilter::default(), SortKey::Date);
    assert!(by_date.windows(2).all(|w| w[0].date <= w[1].date));

    let popular = views::browse(&events, &BrowseFilter::default(), SortKey::Popularity);
    let counts: Vec<u32> = popular.iter().map(|e| e.rsvp_count).collect();
    assert_eq!(counts, vec![324, 89, 62]);

    let online = BrowseFilter::default().with_search("WEBINAR");
    let found = views::browse(&events, &online, SortKey::Date);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, SEED_EVENT_WORKSHOP);

    let austin = BrowseFilter::default().with_location("Austin");
    assert_eq!(views::browse(&events, &austin, SortKey::Date).len(), 1);

    let split = views::split_featured(by_date);
    assert_eq!(split.featured.len(), FEATURED_COUNT);
    assert!(split.regular.is_empty());
}

#[tokio::test]
async fn test_private_events_hidden_from_browse() {
    let (deck, _) = loaded_deck().await;
    let id = create(&deck, future_event(SEED_HOST_JOHN, 10).with_visibility(false)).await;

    let events = deck.events();
    assert_eq!(events[0].id, id);
    let visible = BrowseFilter::default().apply(&events);
    assert_eq!(visible.len(), 3);
    assert!(visible.iter().all(|e| e.id != id));

    // Still shows up for its host.
    assert!(views::hosted_by(&events, SEED_HOST_JOHN)
        .iter()
        .any(|e| e.id == id));
}

#[tokio::test]
async fn test_host_dashboard() {
    let (deck, _) = loaded_deck().await;
    let events = deck.events();

    let john = HostStats::compute(&events, SEED_HOST_JOHN, today());
    assert_eq!(john.total_events, 2);
    assert_eq!(john.total_attendees, 413);
    assert_eq!(john.average_attendance, 207);
    assert_eq!(john.active_events, 2);

    let sarah = HostStats::compute(&events, SEED_HOST_SARAH, today());
    assert_eq!(sarah.total_events, 1);
    assert_eq!(sarah.total_attendees, 62);

    let nobody = HostStats::compute(&events, Uuid::now_v7(), today());
    assert_eq!(nobody, HostStats::default());

    let upcoming = views::upcoming(&events, today(), views::DASHBOARD_UPCOMING);
    assert_eq!(upcoming.len(), 3);
}

#[tokio::test]
async fn test_capacity_scenario_raw_stores_vs_deck() {
    // Raw stores: both RSVPs succeed and the counter never moves.
    let events = EventStore::with_events(Vec::new());
    let rsvps = RsvpStore::new(Arc::new(events.clone()), Duration::ZERO);
    let event = events.create(future_event(SEED_HOST_JOHN, 1));
    rsvps.create(event.id, Uuid::now_v7()).await.unwrap();
    rsvps.create(event.id, Uuid::now_v7()).await.unwrap();
    assert_eq!(rsvps.len(), 2);
    assert_eq!(events.get(event.id).unwrap().rsvp_count, 0);

    // Deck with default policy: confirm then waitlist.
    let (deck, sink) = loaded_deck().await;
    let id = create(&deck, future_event(SEED_HOST_JOHN, 1)).await;
    let (alice, bob) = (Uuid::now_v7(), Uuid::now_v7());

    deck.execute(Command::Rsvp {
        event_id: id,
        user_id: alice,
    })
    .await
    .unwrap();
    deck.execute(Command::Rsvp {
        event_id: id,
        user_id: bob,
    })
    .await
    .unwrap();

    let event = deck.event(id).unwrap();
    assert_eq!(event.rsvp_count, 1);
    assert_eq!(Availability::of(&event).tier, AvailabilityTier::SoldOut);

    let statuses: Vec<RsvpStatus> = views::rsvps_for_event(&deck.rsvps(), id)
        .iter()
        .map(|r| r.status)
        .collect();
    assert_eq!(statuses, vec![RsvpStatus::Confirmed, RsvpStatus::Waitlist]);
    assert_eq!(views::rsvps_for_user(&deck.rsvps(), bob).len(), 1);
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn test_counter_tracks_confirmed_rsvps() {
    let (deck, _) = loaded_deck().await;
    let id = create(&deck, future_event(SEED_HOST_JOHN, 3)).await;

    let mut rsvp_ids = Vec::new();
    for _ in 0..5 {
        let outcome = deck
            .execute(Command::Rsvp {
                event_id: id,
                user_id: Uuid::now_v7(),
            })
            .await
            .unwrap();
        if let CommandOutcome::RsvpRecorded(receipt) = outcome {
            rsvp_ids.push(receipt.rsvp.id);
        }
    }

    deck.execute(Command::SetRsvpStatus {
        rsvp_id: rsvp_ids[1],
        status: RsvpStatus::Declined,
    })
    .await
    .unwrap();

    let confirmed = views::rsvps_for_event(&deck.rsvps(), id)
        .iter()
        .filter(|r| r.status.holds_seat())
        .count() as u32;
    let event = deck.event(id).unwrap();
    assert_eq!(event.rsvp_count, confirmed);
    assert_eq!(event.rsvp_count, 3);
    assert_eq!(
        deck.rsvp(rsvp_ids[3]).unwrap().status,
        RsvpStatus::Confirmed
    );
    assert_eq!(deck.rsvp(rsvp_ids[4]).unwrap().status, RsvpStatus::Waitlist);
}

#[tokio::test]
async fn test_update_and_cancel_flow() {
    let (deck, sink) = loaded_deck().await;
    let id = create(&deck, future_event(SEED_HOST_SARAH, 20)).await;
    let user = Uuid::now_v7();
    deck.execute(Command::Rsvp {
        event_id: id,
        user_id: user,
    })
    .await
    .unwrap();

    let retitle = UpdateEventInput {
        title: Some("Launch Party (moved)".to_string()),
        location: Some("Harbour Hall, Lisbon".to_string()),
        ..Default::default()
    };
    let first = deck
        .execute(Command::UpdateEvent {
            event_id: id,
            input: retitle.clone(),
        })
        .await
        .unwrap();
    let second = deck
        .execute(Command::UpdateEvent {
            event_id: id,
            input: retitle,
        })
        .await
        .unwrap();
    assert_eq!(first, second);

    let blank = UpdateEventInput {
        title: Some("   ".to_string()),
        ..Default::default()
    };
    let err = deck
        .execute(Command::UpdateEvent {
            event_id: id,
            input: blank,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EventDeckError::Validation(_)));
    assert_eq!(deck.event(id).unwrap().title, "Launch Party (moved)");
    assert_eq!(deck.event(id).unwrap().status, EventStatus::Upcoming);

    deck.execute(Command::DeleteEvent { event_id: id })
        .await
        .unwrap();
    assert!(deck.event(id).is_none());
    assert_eq!(deck.rsvps().len(), 1);

    let kinds: Vec<NotificationKind> = sink.for_user(user).iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NotificationKind::RsvpConfirmation,
            NotificationKind::EventUpdate,
            NotificationKind::EventUpdate,
            NotificationKind::EventCancelled,
        ]
    );
}

#[tokio::test]
async fn test_concurrent_rsvps_never_overbook() {
    let (deck, _) = loaded_deck().await;
    let deck = Arc::new(deck);
    let id = create(&deck, future_event(SEED_HOST_JOHN, 10)).await;

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let deck = Arc::clone(&deck);
            tokio::spawn(async move {
                deck.execute(Command::Rsvp {
                    event_id: id,
                    user_id: Uuid::now_v7(),
                })
                .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let rsvps = views::rsvps_for_event(&deck.rsvps(), id);
    assert_eq!(rsvps.len(), 50);
    assert_eq!(rsvps.iter().filter(|r| r.status.holds_seat()).count(), 10);
    assert_eq!(deck.event(id).unwrap().rsvp_count, 10);
}
