// Round generation tokens used to retire background tasks on reset.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;

/// Monotonic round counter shared with every background task of a round.
#[derive(Debug, Clone, Default)]
pub struct RoundGeneration {
    current: Arc<AtomicU64>,
    changed: Arc<Notify>,
}

impl RoundGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    /// Token bound to the current generation.
    pub fn token(&self) -> RoundToken {
        RoundToken {
            generation: self.current(),
            current: Arc::clone(&self.current),
            changed: Arc::clone(&self.changed),
        }
    }

    /// Invalidates every outstanding token and wakes tasks waiting on one.
    pub fn advance(&self) -> u64 {
        let next = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        self.changed.notify_waiters();
        next
    }
}

/// Handle a background task checks once per loop iteration.
#[derive(Debug, Clone)]
pub struct RoundToken {
    generation: u64,
    current: Arc<AtomicU64>,
    changed: Arc<Notify>,
}

impl RoundToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.generation
    }

    /// Resolves once the generation this token belongs to has been retired.
    pub async fn invalidated(&self) {
        loop {
            // Register before checking so an advance in between is not missed.
            let notified = self.changed.notified();
            if !self.is_current() {
                return;
            }
            notified.await;
        }
    }
}
