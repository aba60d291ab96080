//! Connectivity signal.
//!
//! The dispatch policy needs a yes/no connectivity answer before every
//! submission. Rather than reading some ambient platform flag, the signal
//! is an injected capability: hosts translate their platform's
//! online/offline events into [`SharedConnectivity::set_online`], and tests
//! supply whatever signal the scenario needs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// A source of the current connectivity state.
pub trait ConnectivitySignal: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Settable connectivity flag shared between the host and the dispatcher.
pub struct SharedConnectivity {
    online: AtomicBool,
}

impl SharedConnectivity {
    pub fn new(online: bool) -> Arc<Self> {
        Arc::new(Self {
            online: AtomicBool::new(online),
        })
    }

    /// Update the flag; transitions are logged.
    pub fn set_online(&self, online: bool) {
        let was = self.online.swap(online, Ordering::SeqCst);
        if was != online {
            info!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }
    }
}

impl ConnectivitySignal for SharedConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
