//! Behavioural tests for event filtering over realistic collections.

use chrono::NaiveDate;
use eventhive_api::models::{decode_events, EventRecord};
use eventhive_search::{
    apply_filters, distinct_venues, in_range_str, matches, CriterionField, DateBucket, EventTypeMatch,
    FilterController, FilterCriteria,
};
use serde_json::json;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Wednesday.
fn anchor() -> NaiveDate {
    day(2024, 1, 10)
}

fn collection() -> Vec<EventRecord> {
    decode_events(json!([
        {"_id": "a", "title": "Rust Workshop", "event_type": "Workshop", "venue": "Pune", "start_date": "2024-01-10", "cost": "0"},
        {"_id": "b", "title": "Jazz Night", "event_type": "Concert", "venue": "Mumbai", "start_date": "2024-01-13", "cost": 799},
        {"_id": "c", "title": "Design Sprint", "eventType": "workshop", "venue": "pune", "startDate": "2024-01-17"},
        {"_id": "d", "title": "Open Mic", "event_type": "ONLINE", "venue": "", "start_date": "soon"},
        {"_id": "e", "title": "New Year Gala", "event_type": "Concert", "venue": "Goa", "start_date": "2024-01-14T19:00:00+05:30"},
        {"_id": "f", "title": "Hack Night", "event_type": "Hackathon", "venue": "PUNE", "start_date": "2024-01-11"},
        {"_id": "g", "title": "Beach Set", "event_type": "Concert ", "venue": " Goa ", "start_date": "2024-01-12"}
    ]))
    .unwrap()
    .events
}

fn ids(events: &[&EventRecord]) -> Vec<String> {
    events.iter().map(|e| e.id.clone()).collect()
}

fn all_ids(events: &[EventRecord]) -> Vec<String> {
    events.iter().map(|e| e.id.clone()).collect()
}

#[test]
fn wildcard_criteria_match_every_event() {
    let events = collection();
    let criteria = FilterCriteria::default();
    for mode in [EventTypeMatch::Exact, EventTypeMatch::TitleContains] {
        for event in &events {
            assert!(matches(event, &criteria, anchor(), mode), "{}", event.id);
        }
    }
}

#[test]
fn wildcard_filter_returns_collection_in_order() {
    let events = collection();
    let visible = apply_filters(&events, &FilterCriteria::default(), anchor(), EventTypeMatch::Exact);
    assert_eq!(ids(&visible), all_ids(&events));
}

#[test]
fn venue_filter_returns_exactly_the_matching_subset() {
    let events = collection();
    let venues = ["Pune", "pune", "MUMBAI", "Goa", "Delhi"];

    for venue in venues {
        let criteria = FilterCriteria::new().venue(venue);
        let visible = apply_filters(&events, &criteria, anchor(), EventTypeMatch::Exact);
        let expected: Vec<String> = events
            .iter()
            .filter(|e| e.venue.trim().to_lowercase() == venue.to_lowercase())
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(ids(&visible), expected, "venue {venue}");
    }

    let pune = apply_filters(
        &events,
        &FilterCriteria::new().venue("Pune"),
        anchor(),
        EventTypeMatch::Exact,
    );
    assert_eq!(ids(&pune), vec!["a", "c", "f"]);

    let goa = apply_filters(
        &events,
        &FilterCriteria::new().venue("goa"),
        anchor(),
        EventTypeMatch::Exact,
    );
    assert_eq!(ids(&goa), vec!["e", "g"]);
}

#[test]
fn every_offered_venue_matches_its_events() {
    let events = collection();
    for venue in distinct_venues(&events) {
        let criteria = FilterCriteria::new().venue(venue);
        let visible = apply_filters(&events, &criteria, anchor(), EventTypeMatch::Exact);
        assert!(!visible.is_empty(), "offered venue {venue:?} matched nothing");
    }
}

#[test]
fn padded_event_type_matches_exactly() {
    let events = collection();
    let criteria = FilterCriteria::new().event_type("concert");
    let visible = apply_filters(&events, &criteria, anchor(), EventTypeMatch::Exact);
    assert_eq!(ids(&visible), vec!["b", "e", "g"]);
}

#[test]
fn applying_twice_is_idempotent() {
    let events = collection();
    let criteria = FilterCriteria::new().event_type("workshop").when("this-week");

    let mut controller = FilterController::new(&events, anchor());
    controller.set_criterion(CriterionField::EventType, criteria.event_type.clone());
    controller.set_criterion(CriterionField::When, criteria.when.clone());

    let first = ids(controller.apply());
    let second = ids(controller.apply());
    assert_eq!(first, second);
    assert_eq!(first, vec!["a"]);

    let direct = apply_filters(&events, &criteria, anchor(), EventTypeMatch::Exact);
    assert_eq!(ids(&direct), first);
}

#[test]
fn anchor_day_is_today_not_tomorrow() {
    assert!(in_range_str(anchor(), "today", anchor()));
    assert!(!in_range_str(anchor(), "tomorrow", anchor()));
    assert!(in_range_str(day(2024, 1, 11), "tomorrow", anchor()));
    assert!(!in_range_str(day(2024, 1, 9), "today", anchor()));
}

#[test]
fn wednesday_scenario() {
    let a = day(2024, 1, 10);
    assert!(in_range_str(a, "today", anchor()));
    assert!(in_range_str(a, "this-week", anchor()));
    assert!(!in_range_str(a, "next-week", anchor()));

    let b = day(2024, 1, 13);
    assert!(in_range_str(b, "this-weekend", anchor()));
    assert!(!in_range_str(b, "today", anchor()));

    let c = day(2024, 1, 17);
    assert!(in_range_str(c, "next-week", anchor()));
    assert!(!in_range_str(c, "this-week", anchor()));
}

#[test]
fn workshop_scenario() {
    let events = decode_events(json!([
        {"_id": "1", "title": "Hands-on Rust", "event_type": "Workshop"},
        {"_id": "2", "title": "Rock Show", "event_type": "Concert"}
    ]))
    .unwrap()
    .events;

    let criteria = FilterCriteria {
        event_type: "workshop".to_string(),
        venue: String::new(),
        when: String::new(),
    };
    let visible = apply_filters(&events, &criteria, anchor(), EventTypeMatch::Exact);
    assert_eq!(ids(&visible), vec!["1"]);
}

#[test]
fn reset_restores_full_collection() {
    let events = collection();
    let mut controller = FilterController::new(&events, anchor());

    controller.set_criterion(CriterionField::Venue, "Mumbai");
    controller.set_criterion(CriterionField::When, "this-weekend");
    assert_eq!(ids(controller.apply()), vec!["b"]);

    controller.reset();
    let after_reset = ids(controller.apply());
    assert_eq!(after_reset, all_ids(&events));
    assert_eq!(ids(controller.visible()), all_ids(&events));
}

#[test]
fn this_weekend_includes_rfc3339_sunday() {
    let events = collection();
    let visible = apply_filters(
        &events,
        &FilterCriteria::new().when("this-weekend"),
        anchor(),
        EventTypeMatch::Exact,
    );
    assert_eq!(ids(&visible), vec!["b", "e"]);
}

#[test]
fn malformed_date_excluded_only_when_a_bucket_is_active() {
    let events = collection();
    for bucket in DateBucket::ALL {
        let visible = apply_filters(
            &events,
            &FilterCriteria::new().when(bucket.as_str()),
            anchor(),
            EventTypeMatch::Exact,
        );
        assert!(!ids(&visible).contains(&"d".to_string()), "{bucket}");
    }

    let unknown = apply_filters(
        &events,
        &FilterCriteria::new().when("whenever"),
        anchor(),
        EventTypeMatch::Exact,
    );
    assert!(ids(&unknown).contains(&"d".to_string()));
}

#[test]
fn title_contains_mode_searches_titles() {
    let events = collection();
    let visible = apply_filters(
        &events,
        &FilterCriteria::new().event_type("night"),
        anchor(),
        EventTypeMatch::TitleContains,
    );
    assert_eq!(ids(&visible), vec!["b", "f"]);
}

#[test]
fn source_collection_is_untouched() {
    let events = collection();
    let before = events.clone();

    let mut controller = FilterController::new(&events, anchor());
    controller.set_criterion(CriterionField::EventType, "concert");
    controller.apply();
    controller.reset();

    assert_eq!(events, before);
}
