//! Flight number validation.
//!
//! Checks that user-entered text plausibly matches an IATA flight number
//! (1-2 letter airline designator followed by 1-4 digits) before any
//! network call is attempted. Validation is pure: no I/O, no side effects.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::poller::PollError;

/// A validated, normalized IATA flight number.
///
/// Always uppercase with surrounding whitespace removed. Construction goes
/// through [`validate`], so a `FlightNumber` is guaranteed to match the
/// IATA pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightNumber(String);

impl FlightNumber {
    /// The normalized flight number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anchored whole-string IATA pattern: 1-2 letters, then 1-4 digits.
fn flight_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{1,2}[0-9]{1,4}$").expect("flight number pattern is valid")
    })
}

/// Validate and normalize a raw flight number string.
///
/// Returns the trimmed input uppercased on success. Fails with
/// [`PollError::EmptyInput`] for empty or whitespace-only input and
/// [`PollError::InvalidFlightNumber`] for anything that does not match the
/// IATA pattern.
pub fn validate(raw: &str) -> Result<FlightNumber, PollError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PollError::EmptyInput);
    }
    if !flight_number_pattern().is_match(trimmed) {
        return Err(PollError::InvalidFlightNumber);
    }
    Ok(FlightNumber(trimmed.to_uppercase()))
}
