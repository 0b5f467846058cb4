//! Monotonic request tokens
//!
//! Every outgoing request takes the next token. A response is only applied
//! if its token is still the latest one issued; anything older lost the
//! race to a newer request and is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Position of a request in issue order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Hands out request tokens; clones share the same counter
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a request about to be sent
    pub fn next(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no request was issued after `token`
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Pass `response` through only if `token` is still current
    pub fn accept<T>(&self, token: RequestToken, response: T) -> Option<T> {
        if self.is_current(token) {
            Some(response)
        } else {
            debug!("Dropping stale response for request {}", token.0);
            None
        }
    }
}
