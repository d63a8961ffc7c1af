use super::*;

fn make_event(id: &str, title: &str, event_type: &str, venue: &str, date: &str) -> EventRecord {
    EventRecord {
        id: id.to_string(),
        title: title.to_string(),
        venue: venue.to_string(),
        event_type: event_type.to_string(),
        start_date: date.to_string(),
        start_time: "10:00".to_string(),
        end_date: None,
        end_time: None,
        cost: None,
        description: None,
        image_base64: None,
    }
}

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn exact(event: &EventRecord, criteria: &FilterCriteria) -> bool {
    matches(event, criteria, anchor(), EventTypeMatch::Exact)
}

#[test]
fn test_empty_criteria_match_everything() {
    let events = [
        make_event("1", "Rust Workshop", "Workshop", "Pune", "2024-01-10"),
        make_event("2", "", "", "", ""),
        make_event("3", "Broken date", "Concert", "Goa", "not a date"),
    ];
    let criteria = FilterCriteria::new();
    assert!(criteria.is_wildcard());
    for event in &events {
        assert!(exact(event, &criteria));
    }
}

#[test]
fn test_event_type_exact_is_case_insensitive() {
    let event = make_event("1", "Rust Workshop", "Workshop", "Pune", "2024-01-10");
    assert!(exact(&event, &FilterCriteria::new().event_type("workshop")));
    assert!(exact(&event, &FilterCriteria::new().event_type("  WORKSHOP ")));
    assert!(!exact(&event, &FilterCriteria::new().event_type("work")));
    assert!(!exact(&event, &FilterCriteria::new().event_type("concert")));
}

#[test]
fn test_event_type_title_contains() {
    let event = make_event("1", "Intro Rust Workshop", "ONLINE", "Pune", "2024-01-10");
    let criteria = FilterCriteria::new().event_type("workshop");

    assert!(!matches(&event, &criteria, anchor(), EventTypeMatch::Exact));
    assert!(matches(
        &event,
        &criteria,
        anchor(),
        EventTypeMatch::TitleContains
    ));
    assert!(!matches(
        &event,
        &FilterCriteria::new().event_type("concert"),
        anchor(),
        EventTypeMatch::TitleContains
    ));
}

#[test]
fn test_venue_equality_not_substring() {
    let event = make_event("1", "Meetup", "Workshop", "Pune Hall", "2024-01-10");
    assert!(exact(&event, &FilterCriteria::new().venue("pune hall")));
    assert!(!exact(&event, &FilterCriteria::new().venue("pune")));
}

#[test]
fn test_date_predicate() {
    let event = make_event("1", "Meetup", "Workshop", "Pune", "2024-01-13");
    assert!(exact(&event, &FilterCriteria::new().when("this-weekend")));
    assert!(exact(&event, &FilterCriteria::new().when("this-week")));
    assert!(!exact(&event, &FilterCriteria::new().when("today")));
}

#[test]
fn test_unparseable_date_never_matches_a_bucket() {
    let event = make_event("1", "Meetup", "Workshop", "Pune", "13/01/2024");
    for bucket in DateBucket::ALL {
        assert!(!exact(&event, &FilterCriteria::new().when(bucket.as_str())));
    }
}

#[test]
fn test_unknown_bucket_is_wildcard() {
    let event = make_event("1", "Meetup", "Workshop", "Pune", "garbage");
    let criteria = FilterCriteria::new().when("someday");
    assert!(criteria.is_wildcard());
    assert!(exact(&event, &criteria));
}

#[test]
fn test_rfc3339_start_date_matches_by_day() {
    let event = make_event("1", "Meetup", "Workshop", "Pune", "2024-01-11T09:30:00Z");
    assert!(exact(&event, &FilterCriteria::new().when("tomorrow")));
}

#[test]
fn test_predicates_combine_with_and() {
    let event = make_event("1", "Meetup", "Workshop", "Pune", "2024-01-10");
    let all = FilterCriteria::new()
        .event_type("workshop")
        .venue("pune")
        .when("today");
    assert!(exact(&event, &all));

    let wrong_venue = all.clone().venue("Mumbai");
    assert!(!exact(&event, &wrong_venue));

    let wrong_day = all.when("next-week");
    assert!(!exact(&event, &wrong_day));
}

#[test]
fn test_filter_events_preserves_order() {
    let events = vec![
        make_event("1", "A", "Workshop", "Pune", "2024-01-10"),
        make_event("2", "B", "Concert", "Pune", "2024-01-10"),
        make_event("3", "C", "workshop", "Goa", "2024-01-12"),
    ];
    let matcher = EventMatcher::new(
        &FilterCriteria::new().event_type("Workshop"),
        anchor(),
        EventTypeMatch::Exact,
    );
    let ids: Vec<&str> = matcher
        .filter_events(&events)
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn test_event_type_match_parse_and_display() {
    assert_eq!("exact".parse::<EventTypeMatch>(), Ok(EventTypeMatch::Exact));
    assert_eq!(
        " Title-Contains ".parse::<EventTypeMatch>(),
        Ok(EventTypeMatch::TitleContains)
    );
    assert!("fuzzy".parse::<EventTypeMatch>().is_err());
    assert_eq!(EventTypeMatch::TitleContains.to_string(), "title-contains");
    assert_eq!(EventTypeMatch::default(), EventTypeMatch::Exact);
}

#[test]
fn test_criteria_deserialize_with_missing_fields() {
    let criteria: FilterCriteria = serde_json::from_str(r#"{"venue": "Pune"}"#).unwrap();
    assert_eq!(criteria, FilterCriteria::new().venue("Pune"));
}
