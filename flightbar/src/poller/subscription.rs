//! The subscription owner: immediate fetch, recurring refresh, transitions.
//!
//! [`FlightPoller`] holds the single mutable `flight`/`PollState` pair
//! behind one lock; state is mutated only in `subscribe`/`unsubscribe` and
//! in fetch-completion handling, so no two fetch completions can interleave
//! writes. Every fetch carries the generation it was started under; a
//! result whose generation has been superseded by a newer `subscribe` is
//! discarded rather than applied.
//!
//! The recurring timer is a spawned task driven by `tokio::time`, cancelled
//! through a `CancellationToken` and re-created (never paused or resumed)
//! on each new subscription. Ticks spawn fetches without awaiting them, so
//! a slow response never delays the next tick.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::PollerConfig;
use crate::flight::FlightSnapshot;
use crate::store::FlightStore;
use crate::validator::{self, FlightNumber};

use super::client::FlightDataClient;
use super::connectivity::ConnectivityMonitor;
use super::error::PollError;
use super::state::{PollState, StatusChange};

/// Capacity of the state and status broadcast channels.
///
/// Transitions are rare (one per fetch); a lagging observer only loses
/// history, never the latest value, which it can re-read via
/// [`FlightPoller::current_state`].
const CHANNEL_CAPACITY: usize = 32;

/// The single active subscription to one flight's status.
///
/// Cheap to clone; clones share the subscription.
pub struct FlightPoller<C, M, S> {
    inner: Arc<Inner<C, M, S>>,
}

impl<C, M, S> Clone for FlightPoller<C, M, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Mutable subscription state, owned exclusively by the poller.
struct Subscription {
    /// The normalized flight number currently subscribed to.
    flight: Option<FlightNumber>,

    /// Latest emitted state.
    state: PollState,

    /// Last status string seen for this subscription (status-change signal).
    last_status: Option<String>,

    /// Bumped on every accepted subscribe; stale fetch results are dropped.
    generation: u64,

    /// Cancellation handle for the recurring refresh task.
    timer: Option<CancellationToken>,
}

struct Inner<C, M, S> {
    client: C,
    connectivity: M,
    store: S,
    config: PollerConfig,
    shared: Mutex<Subscription>,
    state_tx: broadcast::Sender<PollState>,
    status_tx: broadcast::Sender<StatusChange>,
}

impl<C, M, S> FlightPoller<C, M, S>
where
    C: FlightDataClient + 'static,
    M: ConnectivityMonitor + 'static,
    S: FlightStore + 'static,
{
    /// Create a poller in the `Idle` state.
    ///
    /// Nothing is fetched until the first [`subscribe`](Self::subscribe).
    pub fn new(client: C, connectivity: M, store: S, config: PollerConfig) -> Self {
        let (state_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (status_tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                client,
                connectivity,
                store,
                config,
                shared: Mutex::new(Subscription {
                    flight: None,
                    state: PollState::Idle,
                    last_status: None,
                    generation: 0,
                    timer: None,
                }),
                state_tx,
                status_tx,
            }),
        }
    }

    /// Subscribe to a flight, replacing any previous subscription.
    ///
    /// Invalid input emits `Failed` without touching the network or the
    /// timer. A manual re-search (`auto_refresh == false`) of the flight
    /// already subscribed is a no-op; timer ticks and history reselection
    /// pass `auto_refresh == true` and bypass that suppression.
    ///
    /// On acceptance the previous refresh timer is cancelled, one fetch
    /// runs immediately, and a new timer re-fetches at the configured
    /// interval regardless of the first fetch's outcome.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe(&self, raw: &str, auto_refresh: bool) {
        let flight = match validator::validate(raw) {
            Ok(flight) => flight,
            Err(error) => {
                tracing::warn!(input = raw, error = %error, "Rejected flight number");
                let mut shared = self.inner.shared.lock().unwrap();
                self.inner.transition(&mut shared, PollState::Failed(error));
                return;
            }
        };

        let (generation, token) = {
            let mut shared = self.inner.shared.lock().unwrap();
            if !auto_refresh && shared.flight.as_ref() == Some(&flight) {
                tracing::debug!(flight = %flight, "Flight already subscribed, ignoring re-search");
                return;
            }

            if let Some(timer) = shared.timer.take() {
                timer.cancel();
            }
            shared.flight = Some(flight.clone());
            shared.last_status = None;
            shared.generation += 1;

            let token = CancellationToken::new();
            shared.timer = Some(token.clone());
            (shared.generation, token)
        };

        if !auto_refresh {
            if let Err(error) = self.inner.store.set_last_flight_number(flight.as_str()) {
                tracing::warn!(error = %error, "Failed to persist last flight number");
            }
            if let Err(error) = self.inner.store.push_recent_flight(flight.as_str()) {
                tracing::warn!(error = %error, "Failed to record recent flight");
            }
        }

        tracing::info!(
            flight = %flight,
            auto_refresh,
            poll_interval_secs = self.inner.config.poll_interval.as_secs(),
            "Subscribed to flight"
        );

        tokio::spawn(Arc::clone(&self.inner).fetch_once(flight.clone(), generation));
        tokio::spawn(Arc::clone(&self.inner).refresh_loop(flight, generation, token));
    }

    /// Cancel the recurring refresh timer.
    ///
    /// Idempotent. The last snapshot (or error) remains the observable
    /// state; a new `subscribe` is required to resume polling.
    pub fn unsubscribe(&self) {
        let mut shared = self.inner.shared.lock().unwrap();
        if let Some(timer) = shared.timer.take() {
            timer.cancel();
            tracing::info!("Polling stopped");
        }
    }

    /// Latest emitted state.
    pub fn current_state(&self) -> PollState {
        self.inner.shared.lock().unwrap().state.clone()
    }

    /// The flight currently subscribed to, if any.
    pub fn current_flight(&self) -> Option<FlightNumber> {
        self.inner.shared.lock().unwrap().flight.clone()
    }

    /// Whether the recurring refresh timer is armed.
    pub fn is_polling(&self) -> bool {
        self.inner.shared.lock().unwrap().timer.is_some()
    }

    /// Subscribe to state transitions.
    ///
    /// Every transition is delivered in order. A receiver that lags behind
    /// the channel capacity loses oldest entries first and can recover the
    /// latest value from [`current_state`](Self::current_state).
    pub fn state_updates(&self) -> broadcast::Receiver<PollState> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribe to status-change signals for user-facing alerting.
    pub fn status_changes(&self) -> broadcast::Receiver<StatusChange> {
        self.inner.status_tx.subscribe()
    }

    /// Last flight number persisted by a manual subscribe.
    pub fn stored_flight_number(&self) -> Option<String> {
        self.inner.store.last_flight_number()
    }

    /// Recently searched flight numbers, most recent first.
    pub fn recent_flights(&self) -> Vec<String> {
        self.inner.store.recent_flights()
    }
}

impl<C, M, S> Inner<C, M, S>
where
    C: FlightDataClient + 'static,
    M: ConnectivityMonitor + 'static,
    S: FlightStore + 'static,
{
    /// Record and publish a state transition. Caller holds the lock.
    fn transition(&self, shared: &mut Subscription, next: PollState) {
        tracing::debug!(from = %shared.state, to = %next, "Poll state transition");
        shared.state = next.clone();
        let _ = self.state_tx.send(next);
    }

    /// One fetch execution: connectivity gate, request, outcome application.
    ///
    /// Completes for every outcome; the next timer tick is independent of
    /// this fetch's duration.
    async fn fetch_once(self: Arc<Self>, flight: FlightNumber, generation: u64) {
        {
            let mut shared = self.shared.lock().unwrap();
            if shared.generation != generation {
                return;
            }
            self.transition(&mut shared, PollState::Loading);
        }

        if !self.connectivity.is_reachable() {
            tracing::warn!(flight = %flight, "Network unreachable, fetch skipped");
            self.apply_outcome(&flight, generation, Err(PollError::NoConnectivity));
            return;
        }

        let outcome = self.client.fetch_flight(&flight).await;
        self.apply_outcome(&flight, generation, outcome);
    }

    /// Apply a fetch outcome unless a newer subscribe superseded it.
    fn apply_outcome(
        &self,
        flight: &FlightNumber,
        generation: u64,
        outcome: Result<FlightSnapshot, PollError>,
    ) {
        let mut shared = self.shared.lock().unwrap();
        if shared.generation != generation {
            tracing::debug!(flight = %flight, "Discarding result for superseded subscription");
            return;
        }

        match outcome {
            Ok(snapshot) => {
                let status = snapshot.status.clone();
                let landed = snapshot.is_landed();

                if shared
                    .last_status
                    .as_deref()
                    .is_some_and(|previous| previous != status)
                {
                    let _ = self.status_tx.send(StatusChange {
                        flight_no: flight.as_str().to_string(),
                        status: status.clone(),
                    });
                }
                shared.last_status = Some(status);

                self.transition(&mut shared, PollState::Ready(snapshot));

                if landed {
                    if let Some(timer) = shared.timer.take() {
                        timer.cancel();
                    }
                    tracing::info!(flight = %flight, "Flight landed, polling stopped");
                }
            }
            Err(error) => {
                // Failures wait for the next scheduled tick; the armed
                // timer survives every I/O-stage error.
                self.transition(&mut shared, PollState::Failed(error));
            }
        }
    }

    /// Recurring refresh driven by the poll interval.
    ///
    /// Exits when cancelled or when its generation is superseded. Ticks
    /// spawn fetches rather than awaiting them, so overlapping requests
    /// are possible and resolved by the generation check.
    async fn refresh_loop(
        self: Arc<Self>,
        flight: FlightNumber,
        generation: u64,
        token: CancellationToken,
    ) {
        let period = self.config.poll_interval;
        let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticks.tick() => {
                    if self.shared.lock().unwrap().generation != generation {
                        break;
                    }
                    tokio::spawn(Arc::clone(&self).fetch_once(flight.clone(), generation));
                }
            }
        }

        tracing::debug!(flight = %flight, "Refresh timer stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::super::connectivity::{AlwaysReachable, SharedConnectivity};
    use super::*;
    use crate::store::MemoryFlightStore;

    fn sample_snapshot(flight_no: &str, status: &str) -> FlightSnapshot {
        serde_json::from_str(&format!(
            r#"{{
                "flight_no": "{flight_no}",
                "airline": {{"iata": "AC", "name": "Air Canada"}},
                "departure": {{"iata": "YYZ"}},
                "arrival": {{"iata": "YVR"}},
                "status": "{status}"
            }}"#
        ))
        .unwrap()
    }

    /// Scripted client returning the same outcome on every call.
    struct MockFlightClient {
        outcome: Result<FlightSnapshot, PollError>,
        calls: Arc<AtomicUsize>,
        queried: Arc<Mutex<Vec<String>>>,
    }

    impl MockFlightClient {
        fn new(outcome: Result<FlightSnapshot, PollError>) -> Self {
            Self {
                outcome,
                calls: Arc::new(AtomicUsize::new(0)),
                queried: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl FlightDataClient for MockFlightClient {
        async fn fetch_flight(&self, flight: &FlightNumber) -> Result<FlightSnapshot, PollError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queried.lock().unwrap().push(flight.as_str().to_string());
            self.outcome.clone()
        }
    }

    /// Poll `current_state` until the predicate holds or a second passes.
    async fn wait_for_state<C, M, S>(
        poller: &FlightPoller<C, M, S>,
        predicate: impl Fn(&PollState) -> bool,
    ) -> PollState
    where
        C: FlightDataClient + 'static,
        M: ConnectivityMonitor + 'static,
        S: FlightStore + 'static,
    {
        for _ in 0..100 {
            let state = poller.current_state();
            if predicate(&state) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        poller.current_state()
    }

    fn make_poller(
        client: MockFlightClient,
    ) -> FlightPoller<MockFlightClient, AlwaysReachable, MemoryFlightStore> {
        FlightPoller::new(
            client,
            AlwaysReachable,
            MemoryFlightStore::new(),
            PollerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let poller = make_poller(MockFlightClient::new(Ok(sample_snapshot("AC123", "active"))));

        assert_eq!(poller.current_state(), PollState::Idle);
        assert_eq!(poller.current_flight(), None);
        assert!(!poller.is_polling());
    }

    #[tokio::test]
    async fn test_invalid_flight_number_never_touches_network() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "active")));
        let calls = Arc::clone(&client.calls);
        let poller = make_poller(client);

        poller.subscribe("12AB", false);

        assert_eq!(
            poller.current_state(),
            PollState::Failed(PollError::InvalidFlightNumber)
        );
        assert!(!poller.is_polling(), "input errors must not arm the timer");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_input_fails_without_fetch() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "active")));
        let calls = Arc::clone(&client.calls);
        let poller = make_poller(client);

        poller.subscribe("   ", false);

        assert_eq!(
            poller.current_state(),
            PollState::Failed(PollError::EmptyInput)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_subscribe_fetches_normalized_flight() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC1", "active")));
        let queried = Arc::clone(&client.queried);
        let poller = make_poller(client);

        poller.subscribe("ac1", false);

        let state = wait_for_state(&poller, |s| matches!(s, PollState::Ready(_))).await;
        assert_eq!(state.snapshot().unwrap().flight_no, "AC1");
        assert_eq!(queried.lock().unwrap().as_slice(), ["AC1"]);
        assert!(poller.is_polling());
    }

    #[tokio::test]
    async fn test_manual_resubscribe_same_flight_is_noop() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "active")));
        let calls = Arc::clone(&client.calls);
        let poller = make_poller(client);

        poller.subscribe("AC123", false);
        wait_for_state(&poller, |s| matches!(s, PollState::Ready(_))).await;

        poller.subscribe("ac123", false);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1, "no duplicate fetch");
    }

    #[tokio::test]
    async fn test_auto_refresh_bypasses_suppression() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "active")));
        let calls = Arc::clone(&client.calls);
        let poller = make_poller(client);

        poller.subscribe("AC123", false);
        wait_for_state(&poller, |s| matches!(s, PollState::Ready(_))).await;

        poller.subscribe("AC123", true);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_connectivity_issues_no_request_but_keeps_timer() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "active")));
        let calls = Arc::clone(&client.calls);
        let poller = FlightPoller::new(
            client,
            SharedConnectivity::new(false),
            MemoryFlightStore::new(),
            PollerConfig::default(),
        );

        poller.subscribe("AC123", false);

        let state = wait_for_state(&poller, |s| matches!(s, PollState::Failed(_))).await;
        assert_eq!(state, PollState::Failed(PollError::NoConnectivity));
        assert_eq!(calls.load(Ordering::SeqCst), 0, "no network call");
        assert!(poller.is_polling(), "timer survives I/O-stage errors");
    }

    #[tokio::test]
    async fn test_landed_snapshot_stops_polling() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "Landed")));
        let poller = make_poller(client);

        poller.subscribe("AC123", false);

        let state = wait_for_state(&poller, |s| matches!(s, PollState::Ready(_))).await;
        assert!(state.snapshot().unwrap().is_landed());
        assert!(!poller.is_polling(), "terminal state cancels the timer");
        // The Ready state is retained as the observable value
        assert!(matches!(poller.current_state(), PollState::Ready(_)));
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent_and_keeps_snapshot() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "active")));
        let poller = make_poller(client);

        poller.subscribe("AC123", false);
        wait_for_state(&poller, |s| matches!(s, PollState::Ready(_))).await;

        poller.unsubscribe();
        poller.unsubscribe();

        assert!(!poller.is_polling());
        assert!(matches!(poller.current_state(), PollState::Ready(_)));
    }

    #[tokio::test]
    async fn test_manual_subscribe_persists_flight_number() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "active")));
        let poller = make_poller(client);

        poller.subscribe("ac123", false);
        wait_for_state(&poller, |s| matches!(s, PollState::Ready(_))).await;

        assert_eq!(poller.stored_flight_number().as_deref(), Some("AC123"));
        assert_eq!(poller.recent_flights(), ["AC123"]);
    }

    #[tokio::test]
    async fn test_auto_refresh_does_not_persist() {
        let client = MockFlightClient::new(Ok(sample_snapshot("AC123", "active")));
        let poller = make_poller(client);

        poller.subscribe("AC123", true);
        wait_for_state(&poller, |s| matches!(s, PollState::Ready(_))).await;

        assert_eq!(poller.stored_flight_number(), None);
        assert!(poller.recent_flights().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let client = MockFlightClient::new(Err(PollError::TransportFailure));
        let poller = make_poller(client);

        poller.subscribe("AC123", false);

        let state = wait_for_state(&poller, |s| matches!(s, PollState::Failed(_))).await;
        assert_eq!(state, PollState::Failed(PollError::TransportFailure));
        assert!(poller.is_polling(), "timer survives transport failures");
    }
}
