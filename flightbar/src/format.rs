//! Display formatting helpers.
//!
//! Shared by any front end that renders a snapshot into a compact label:
//! airport names are shortened to fit narrow layouts, and wire timestamps
//! are reduced to the `HH:MM` the user actually cares about.

use chrono::{DateTime, NaiveDateTime};

/// Shorten an airport name for compact display.
///
/// Replaces the word "International" (any case) with "Intl"; other words
/// pass through unchanged.
pub fn short_airport_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            if word.eq_ignore_ascii_case("international") {
                "Intl"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce a wire timestamp to `HH:MM`.
///
/// Accepts RFC 3339 (`2026-08-07T14:30:00+00:00`) and the bare
/// `YYYY-MM-DDTHH:MM:SS` form some upstream feeds use. Anything that does
/// not parse is returned unchanged so absent markers like "N/A" survive.
pub fn short_time(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.format("%H:%M").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        return parsed.format("%H:%M").to_string();
    }
    timestamp.to_string()
}

/// `HH:MM` for an optional wire timestamp, "N/A" when absent.
pub fn short_time_or_na(timestamp: Option<&str>) -> String {
    match timestamp {
        Some(value) => short_time(value),
        None => "N/A".to_string(),
    }
}
