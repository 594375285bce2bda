//! Session state shared between the caller and the cache.

use std::sync::atomic::{AtomicBool, Ordering};

use type_explorer_sdk::SessionContext;

/// Mutable session flags, safe to share across tasks.
#[derive(Debug, Default)]
pub struct SessionState {
    enterprise_option: AtomicBool,
}

impl SessionState {
    #[must_use]
    pub fn new(enterprise_option: bool) -> Self {
        Self {
            enterprise_option: AtomicBool::new(enterprise_option),
        }
    }

    pub fn set_enterprise_option(&self, enabled: bool) {
        self.enterprise_option.store(enabled, Ordering::SeqCst);
    }

    /// Flips the enterprise option and returns the new value.
    pub fn toggle_enterprise_option(&self) -> bool {
        !self.enterprise_option.fetch_xor(true, Ordering::SeqCst)
    }
}

impl SessionContext for SessionState {
    fn enterprise_option(&self) -> bool {
        self.enterprise_option.load(Ordering::SeqCst)
    }
}
