//! Termination signal handling.
//!
//! A signal only sets a flag; the turn loop checks it at each turn boundary.
//! If the loop is blocked on input, the handler ends the process itself once
//! the grace period has passed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::warn;

/// Shared "termination requested" flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a flag that is not set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether termination has been requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Install a SIGINT/SIGTERM handler that sets the flag, waits `grace`,
    /// then calls `on_expire`.
    ///
    /// Repeated signals while the grace period runs are ignored.
    ///
    /// # Errors
    ///
    /// Fails if a handler is already installed for this process.
    pub fn install<F>(grace: Duration, on_expire: F) -> Result<Self, ctrlc::Error>
    where
        F: Fn() + Send + 'static,
    {
        let signal = Self::new();
        let flag = signal.clone();
        ctrlc::set_handler(move || {
            if flag.requested.swap(true, Ordering::SeqCst) {
                return;
            }
            warn!(?grace, "shutdown.requested");
            std::thread::sleep(grace);
            on_expire();
        })?;
        Ok(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_clear() {
        assert!(!ShutdownSignal::new().is_requested());
    }

    #[test]
    fn test_request_is_shared_between_clones() {
        let signal = ShutdownSignal::new();
        let other = signal.clone();
        other.request();
        assert!(signal.is_requested());
    }
}
