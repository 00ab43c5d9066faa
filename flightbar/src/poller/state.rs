//! Observable poll state and the status-change signal.

use std::fmt;

use crate::flight::FlightSnapshot;

use super::error::PollError;

/// The poller's observable state.
///
/// Exactly one variant holds at any instant. A new successful fetch fully
/// replaces the previous `Ready` snapshot; there is no field-level merge.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PollState {
    /// No subscription has been made yet.
    #[default]
    Idle,
    /// A fetch for the current flight is in progress.
    Loading,
    /// The last fetch decoded successfully.
    Ready(FlightSnapshot),
    /// The last subscribe or fetch attempt failed.
    Failed(PollError),
}

impl PollState {
    /// The snapshot carried by a `Ready` state, if any.
    pub fn snapshot(&self) -> Option<&FlightSnapshot> {
        match self {
            Self::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Ready(snapshot) => write!(f, "Ready({})", snapshot.flight_no),
            Self::Failed(error) => write!(f, "Failed({error})"),
        }
    }
}

/// Signal emitted when the fetched status differs from the previously seen
/// status for the current subscription.
///
/// Delivered separately from [`PollState`] transitions so that alerting
/// (e.g. a desktop notification) does not have to diff snapshots itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// The normalized flight number of the subscription.
    pub flight_no: String,
    /// The newly observed status string, as reported by the service.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> FlightSnapshot {
        serde_json::from_str(
            r#"{
                "flight_no": "AC123",
                "airline": {"iata": "AC", "name": "Air Canada"},
                "departure": {"iata": "YYZ"},
                "arrival": {"iata": "YVR"},
                "status": "en-route"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(PollState::default(), PollState::Idle);
    }

    #[test]
    fn test_snapshot_accessor() {
        assert!(PollState::Idle.snapshot().is_none());
        assert!(PollState::Loading.snapshot().is_none());
        assert!(PollState::Failed(PollError::DecodeFailure)
            .snapshot()
            .is_none());

        let ready = PollState::Ready(sample_snapshot());
        assert_eq!(ready.snapshot().unwrap().flight_no, "AC123");
    }

    #[test]
    fn test_display() {
        assert_eq!(PollState::Idle.to_string(), "Idle");
        assert_eq!(PollState::Loading.to_string(), "Loading");
        assert_eq!(
            PollState::Ready(sample_snapshot()).to_string(),
            "Ready(AC123)"
        );
        assert_eq!(
            PollState::Failed(PollError::NoConnectivity).to_string(),
            "Failed(network is unreachable)"
        );
    }
}
