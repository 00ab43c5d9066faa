//! Terminal rendering of poll states.
//!
//! Formats a [`PollState`] into the plain-text panel printed on every
//! transition. Error wording here is the user-facing presentation of the
//! kind-only [`PollError`] taxonomy.

use flightbar::flight::{FlightEndpoint, FlightSnapshot};
use flightbar::format::{short_airport_name, short_time_or_na};
use flightbar::poller::{PollError, PollState};

/// Render a poll state for the terminal.
pub fn render_state(state: &PollState) -> String {
    match state {
        PollState::Idle => "No flight loaded.".to_string(),
        PollState::Loading => "Loading flight details...".to_string(),
        PollState::Ready(snapshot) => render_snapshot(snapshot),
        PollState::Failed(error) => render_error(*error),
    }
}

fn render_error(error: PollError) -> String {
    let message = match error {
        PollError::EmptyInput => "Please enter a flight number.",
        PollError::InvalidFlightNumber => {
            "That doesn't look like a flight number. Try something like AC123."
        }
        PollError::NoConnectivity => "No internet connection. Will retry on the next refresh.",
        PollError::TransportFailure => {
            "Error fetching flight details. Please check your connection."
        }
        PollError::DecodeFailure => "Flight details not found. Please check the flight number.",
    };
    message.to_string()
}

fn render_snapshot(snapshot: &FlightSnapshot) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} - {}",
        snapshot.airline.name,
        snapshot.flight_no.to_uppercase()
    ));
    lines.push(format!("Status: {}", capitalize(&snapshot.status)));
    lines.push(String::new());
    lines.push(render_endpoint("DEP", &snapshot.departure));
    lines.push(render_endpoint("ARR", &snapshot.arrival));

    if let Some(geography) = &snapshot.geography {
        let mut live = Vec::new();
        if let (Some(lat), Some(lon)) = (geography.latitude, geography.longitude) {
            live.push(format!("POS {:.1}°, {:.1}°", lat, lon));
        }
        if let Some(altitude) = geography.altitude {
            live.push(format!("ALT {:.0}m", altitude));
        }
        if let Some(direction) = geography.direction {
            live.push(format!("DIR {:.0}°", direction));
        }
        if let Some(speed) = &snapshot.speed {
            if let Some(horizontal) = speed.horizontal {
                live.push(format!("SPD {:.0}km/h", horizontal));
            }
        }
        if !live.is_empty() {
            lines.push(String::new());
            lines.push(format!("  {}", live.join("  ")));
        }
    }

    lines.push(String::new());
    match &snapshot.timestamp {
        Some(timestamp) => lines.push(format!(
            "All times in UTC. Last updated: {}",
            short_time_or_na(Some(timestamp.as_str()))
        )),
        None => lines.push("All times in UTC.".to_string()),
    }

    lines.join("\n")
}

fn render_endpoint(label: &str, endpoint: &FlightEndpoint) -> String {
    let name = endpoint
        .persistent
        .as_ref()
        .and_then(|info| info.name.as_deref())
        .map(short_airport_name)
        .unwrap_or_default();

    // Actual time wins over the estimate once the flight has moved
    let (time_label, time) = match (&endpoint.actual_time, &endpoint.estimated_time) {
        (Some(actual), _) => ("ACTL", short_time_or_na(Some(actual.as_str()))),
        (None, estimated) => ("ESTD", short_time_or_na(estimated.as_deref())),
    };

    let mut line = format!(
        "  {} {} {}  SCHD {}  {} {}",
        label,
        endpoint.iata.to_uppercase(),
        name,
        short_time_or_na(endpoint.scheduled_time.as_deref()),
        time_label,
        time,
    );

    if let Some(delay) = endpoint.delay.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!("  (delay {delay} min)"));
    }

    line
}

fn capitalize(status: &str) -> String {
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
