//! Periodic token-expiry watcher.
//!
//! The owning context (the app shell) spawns one watcher next to its
//! `SessionManager` and keeps it alive for as long as the session should be
//! monitored. Dropping the watcher cancels the background task, so no timer
//! outlives its owner.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::session::SessionManager;

/// How often the persisted token is rechecked for expiry
const CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Handle to the background expiry-check task.
pub struct ExpiryWatcher {
    handle: JoinHandle<()>,
}

impl ExpiryWatcher {
    /// Spawn the recurring expiry check on the current tokio runtime.
    pub fn spawn(session: Arc<Mutex<SessionManager>>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(CHECK_INTERVAL);
            // The first tick completes immediately; restore() already ran an
            // equivalent check at startup, so skip it.
            interval.tick().await;
            loop {
                interval.tick().await;
                debug!("running periodic expiry check");
                let result = {
                    let mut session = session.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    session.check_expiry()
                };
                if let Err(e) = result {
                    warn!("expiry check failed: {e:#}");
                }
            }
        });
        Self { handle }
    }
}

impl Drop for ExpiryWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
