//! Network reachability gate.
//!
//! The poller samples reachability synchronously at the start of each
//! fetch; when the network is down it reports `NoConnectivity` instead of
//! issuing a request that is guaranteed to fail. The trait keeps the
//! platform-specific path monitor out of the core.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait for sampling whether a network path is currently available.
pub trait ConnectivityMonitor: Send + Sync {
    /// Is the network reachable right now?
    fn is_reachable(&self) -> bool;
}

/// Monitor that always reports the network as reachable.
///
/// Used where no platform path monitor is wired in; the fetch itself will
/// surface a `TransportFailure` if the network is actually down.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReachable;

impl ConnectivityMonitor for AlwaysReachable {
    fn is_reachable(&self) -> bool {
        true
    }
}

/// Shared flag-backed monitor.
///
/// A platform integration (or a test) flips the flag; the poller samples
/// it. Clones share the same underlying flag.
#[derive(Debug, Clone)]
pub struct SharedConnectivity {
    reachable: Arc<AtomicBool>,
}

impl SharedConnectivity {
    /// Create a monitor with the given initial reachability.
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: Arc::new(AtomicBool::new(reachable)),
        }
    }

    /// Update the reachability flag.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Relaxed);
    }
}

impl ConnectivityMonitor for SharedConnectivity {
    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_reachable() {
        assert!(AlwaysReachable.is_reachable());
    }

    #[test]
    fn test_shared_connectivity_toggles() {
        let monitor = SharedConnectivity::new(true);
        assert!(monitor.is_reachable());

        monitor.set_reachable(false);
        assert!(!monitor.is_reachable());

        monitor.set_reachable(true);
        assert!(monitor.is_reachable());
    }

    #[test]
    fn test_clones_share_flag() {
        let monitor = SharedConnectivity::new(true);
        let clone = monitor.clone();

        monitor.set_reachable(false);
        assert!(!clone.is_reachable());
    }
}
