//! Venue listing and "did you mean" suggestions.

use eventhive_api::models::EventRecord;
use strsim::levenshtein;

/// Maximum Levenshtein distance to consider a venue as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Distinct non-blank venues, in first-seen order.
///
/// Venues differing only by case are the same venue; the first spelling wins.
pub fn distinct_venues(events: &[EventRecord]) -> Vec<&str> {
    let mut seen: Vec<String> = Vec::new();
    let mut venues = Vec::new();

    for event in events {
        let venue = event.venue.trim();
        if venue.is_empty() {
            continue;
        }
        let key = venue.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            venues.push(venue);
        }
    }

    venues
}

/// Finds the venue closest to `query`, if it is a near miss.
///
/// Exact (case-insensitive) matches return `None`: there is nothing to suggest.
pub fn suggest_venue(query: &str, events: &[EventRecord]) -> Option<String> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return None;
    }

    let (best_match, best_distance) = distinct_venues(events)
        .into_iter()
        .map(|venue| (venue, levenshtein(&query_lower, &venue.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}
