//! Error taxonomy for flight status polling.

use thiserror::Error;

/// Why a subscription or fetch attempt failed.
///
/// The first two kinds are caller-input errors detected before any I/O;
/// the rest are I/O-stage errors. Every kind is terminal for the current
/// fetch attempt only: none crash the process, and an armed refresh timer
/// survives any of them to retry on its next tick. Message text here is a
/// developer-facing summary; user-facing wording is a presentation concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PollError {
    /// The submitted flight number was empty or whitespace-only.
    #[error("flight number is empty")]
    EmptyInput,

    /// The submitted flight number does not match the IATA pattern.
    #[error("flight number is not a valid IATA flight designator")]
    InvalidFlightNumber,

    /// No network path was available when the fetch started.
    #[error("network is unreachable")]
    NoConnectivity,

    /// The request could not be completed (connection, timeout, server error).
    #[error("flight data request failed")]
    TransportFailure,

    /// No flight snapshot could be decoded from the response, including
    /// the service's unknown-flight replies.
    #[error("flight data response could not be decoded")]
    DecodeFailure,
}

impl PollError {
    /// True for errors detected before any I/O is attempted.
    ///
    /// Caller-input errors never arm or touch the refresh timer.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::InvalidFlightNumber)
    }
}
