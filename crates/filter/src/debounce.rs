//! Trailing-edge debouncing
//!
//! Collapses rapid changes (keystrokes in a search box) into one action
//! after a quiet window. Each change takes a ticket; only the ticket issued
//! last settles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shortest window accepted by configuration
pub const MIN_WINDOW: Duration = Duration::from_millis(300);
/// Longest window accepted by configuration
pub const MAX_WINDOW: Duration = Duration::from_millis(500);

/// Debounce window shared by every ticket it issues
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Register a change; supersedes every earlier ticket
    pub fn schedule(&self) -> DebounceTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        DebounceTicket {
            generation,
            shared: self.generation.clone(),
            window: self.window,
        }
    }

    /// Supersede every outstanding ticket without issuing a new one
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(400))
    }
}

/// Claim on the trailing edge of a debounce window
#[derive(Debug)]
pub struct DebounceTicket {
    generation: u64,
    shared: Arc<AtomicU64>,
    window: Duration,
}

impl DebounceTicket {
    /// True if nothing newer has been scheduled
    pub fn is_current(&self) -> bool {
        self.shared.load(Ordering::SeqCst) == self.generation
    }

    /// Wait out the window; true if this ticket is still the latest
    pub async fn settled(self) -> bool {
        tokio::time::sleep(self.window).await;
        self.is_current()
    }
}
