//! Flight data client trait and HTTP implementation.
//!
//! The [`FlightDataClient`] trait abstracts over the flight data service so
//! the poller can be exercised against a scripted client in tests. The
//! [`HttpFlightClient`] implementation talks to the real service via
//! `reqwest`: one `POST <base-url>/flight?iata=<FLIGHT>` per fetch, with a
//! static shared-secret header.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;

use crate::config::PollerConfig;
use crate::flight::FlightSnapshot;
use crate::validator::FlightNumber;

use super::error::PollError;

/// Shared-secret header expected by the flight data service.
const API_KEY_HEADER: &str = "x-key";

/// Trait for fetching the current status of one flight.
///
/// The service is treated as opaque: any 2xx response with a decodable body
/// is success; everything else maps onto the [`PollError`] taxonomy.
pub trait FlightDataClient: Send + Sync {
    /// Fetch the current snapshot for the given flight number.
    fn fetch_flight(
        &self,
        flight: &FlightNumber,
    ) -> impl Future<Output = Result<FlightSnapshot, PollError>> + Send;
}

/// Flight data service client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling and a request
/// timeout taken from the poller configuration.
pub struct HttpFlightClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpFlightClient {
    /// Create a client from the poller configuration.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the HTTP client cannot be built.
    pub fn new(config: &PollerConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/flight", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }
}

impl FlightDataClient for HttpFlightClient {
    async fn fetch_flight(&self, flight: &FlightNumber) -> Result<FlightSnapshot, PollError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("iata", flight.as_str())])
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(flight = %flight, error = %e, "Flight data request failed");
                PollError::TransportFailure
            })?;

        let status = response.status();
        if status.is_client_error() {
            // Unknown flight numbers come back as 404 with an error body
            tracing::warn!(flight = %flight, status = %status, "Flight not found upstream");
            return Err(PollError::DecodeFailure);
        }
        if !status.is_success() {
            tracing::warn!(flight = %flight, status = %status, "Flight data service returned error status");
            return Err(PollError::TransportFailure);
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(flight = %flight, error = %e, "Failed to read flight data response");
            PollError::TransportFailure
        })?;

        let snapshot: FlightSnapshot = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(flight = %flight, error = %e, "Failed to decode flight data response");
            PollError::DecodeFailure
        })?;

        tracing::debug!(
            flight = %flight,
            status = %snapshot.status,
            "Flight snapshot fetched"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator;

    #[test]
    fn test_client_creation() {
        let config = PollerConfig {
            base_url: "https://flights.example.com/".to_string(),
            api_key: "secret".to_string(),
            ..Default::default()
        };

        let client = HttpFlightClient::new(&config).unwrap();
        // Trailing slash on the base URL must not double up
        assert_eq!(client.endpoint, "https://flights.example.com/flight");
        assert_eq!(client.api_key, "secret");
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let config = PollerConfig {
            base_url: "http://localhost:8000".to_string(),
            ..Default::default()
        };

        let client = HttpFlightClient::new(&config).unwrap();
        assert_eq!(client.endpoint, "http://localhost:8000/flight");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        // Reserved TEST-NET-1 address: connection refused or timed out,
        // never resolved to a live service.
        let config = PollerConfig {
            base_url: "http://192.0.2.1:9".to_string(),
            http_timeout: std::time::Duration::from_millis(200),
            ..Default::default()
        };

        let client = HttpFlightClient::new(&config).unwrap();
        let flight = validator::validate("AC123").unwrap();

        let result = client.fetch_flight(&flight).await;
        assert_eq!(result, Err(PollError::TransportFailure));
    }
}
