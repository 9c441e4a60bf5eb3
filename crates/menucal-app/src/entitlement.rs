//! Premium entitlement signal
//!
//! The purchase layer verifies receipts elsewhere and pushes the latest
//! boolean here; the pipeline only ever reads it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use menucal_domain::repository::EntitlementProvider;

/// Shared, refreshable entitlement flag
#[derive(Clone, Default)]
pub struct SharedEntitlement {
    subscribed: Arc<AtomicBool>,
}

impl SharedEntitlement {
    pub fn new(initially_subscribed: bool) -> Self {
        Self {
            subscribed: Arc::new(AtomicBool::new(initially_subscribed)),
        }
    }

    /// Called by the purchase layer whenever the subscription state is
    /// refreshed.
    pub fn set_subscribed(&self, subscribed: bool) {
        self.subscribed.store(subscribed, Ordering::Relaxed);
    }
}

impl EntitlementProvider for SharedEntitlement {
    fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::Relaxed)
    }
}
