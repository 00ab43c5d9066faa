//! Flight status wire model.
//!
//! These are our own types, decoupled from any upstream aviation data
//! provider. They mirror the JSON shape returned by the flight data
//! service: snake_case field names, with most timing and live-position
//! fields optional. Unknown fields in the response are ignored.

use serde::Deserialize;

/// Terminal status value after which no further changes are expected.
const LANDED_STATUS: &str = "landed";

/// Airline identity as reported by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Airline {
    pub iata: String,
    pub name: String,
}

/// Static airport metadata, nested under `persistent` in the wire form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirportInfo {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// One end of the flight: the departure or arrival airport with its times.
///
/// Each time field is independently absent when the upstream provider has
/// not reported it yet (e.g. `actual_time` before departure).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlightEndpoint {
    pub iata: String,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub actual_time: Option<String>,
    #[serde(default)]
    pub delay: Option<String>,
    #[serde(default)]
    pub persistent: Option<AirportInfo>,
}

/// Live speed vector in km/h.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Speed {
    #[serde(default)]
    pub vertical: Option<f64>,
    #[serde(default)]
    pub horizontal: Option<f64>,
}

/// Live position: altitude in metres, direction in degrees, coordinates
/// in decimal degrees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geography {
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub direction: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// The last successfully decoded flight status payload.
///
/// At most one snapshot is current at a time. A new successful fetch fully
/// replaces the previous snapshot; fields are never merged across fetches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlightSnapshot {
    pub flight_no: String,
    pub airline: Airline,
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    pub status: String,
    #[serde(default)]
    pub speed: Option<Speed>,
    #[serde(default)]
    pub geography: Option<Geography>,
    /// Server-supplied timestamp for when the payload was assembled.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Total flight duration in minutes.
    #[serde(default)]
    pub flight_mins: Option<u32>,
}

impl FlightSnapshot {
    /// Whether the flight has reached its terminal state.
    ///
    /// The comparison is case-insensitive: upstream providers report
    /// "landed", "Landed", and "LANDED" interchangeably.
    pub fn is_landed(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(LANDED_STATUS)
    }

    /// Whether live position data is present in this snapshot.
    pub fn has_live_position(&self) -> bool {
        self.geography
            .as_ref()
            .is_some_and(|g| g.latitude.is_some() && g.longitude.is_some())
    }
}
