//! Flight status polling.
//!
//! This module owns the single active polling subscription. A caller
//! submits a flight number; the poller validates it, performs an immediate
//! fetch against the flight data service, then re-fetches on a recurring
//! timer until the flight reaches its terminal state or the subscription
//! is replaced.
//!
//! # State machine
//!
//! The observable state is a [`PollState`]:
//!
//! - `Idle` - before the first subscribe
//! - `Loading` - a fetch is being attempted for the current flight
//! - `Ready(snapshot)` - the last fetch decoded successfully
//! - `Failed(error)` - the last fetch was rejected or failed
//!
//! Transitions are driven only by fetch outcomes and new subscriptions;
//! nothing changes purely with the passage of time except the timer-driven
//! re-entry into `Loading`. A `Ready` snapshot whose status is "landed"
//! stops the timer but remains the observable value.
//!
//! # Components
//!
//! - [`state`] - `PollState` and the `StatusChange` observer signal
//! - [`error`] - `PollError`, the five-kind error taxonomy
//! - [`client`] - `FlightDataClient` trait and the `reqwest` implementation
//! - [`connectivity`] - reachability gate sampled before each fetch
//! - [`subscription`] - `FlightPoller`, the subscription owner and timer

mod client;
mod connectivity;
mod error;
mod state;
mod subscription;

pub use client::{FlightDataClient, HttpFlightClient};
pub use connectivity::{AlwaysReachable, ConnectivityMonitor, SharedConnectivity};
pub use error::PollError;
pub use state::{PollState, StatusChange};
pub use subscription::FlightPoller;
