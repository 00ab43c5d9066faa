//! FlightBar - live flight status tracking core
//!
//! This library provides the core functionality behind the FlightBar status
//! tracker: validating user-entered flight numbers, polling a remote flight
//! data service on a recurring schedule, and publishing state transitions to
//! observers.
//!
//! # High-Level API
//!
//! The [`poller`] module owns the single active subscription:
//!
//! ```ignore
//! use flightbar::config::PollerConfig;
//! use flightbar::poller::{AlwaysReachable, FlightPoller, HttpFlightClient};
//! use flightbar::store::MemoryFlightStore;
//!
//! let config = PollerConfig::default();
//! let client = HttpFlightClient::new(&config)?;
//! let poller = FlightPoller::new(client, AlwaysReachable, MemoryFlightStore::new(), config);
//!
//! let mut updates = poller.state_updates();
//! poller.subscribe("AC123", false);
//! while let Ok(state) = updates.recv().await {
//!     // Render the latest PollState
//! }
//! ```

pub mod config;
pub mod flight;
pub mod format;
pub mod logging;
pub mod poller;
pub mod store;
pub mod validator;

/// Version of the FlightBar library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
