// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use lull_core::{Timer, TokioTimer};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Shared record of every time an action ran, with the instant it ran at.
///
/// Clones share the same record, so one clone can move into an action while
/// the test keeps another for assertions.
///
/// ```
/// use lull_test_utils::HitCounter;
///
/// let counter = HitCounter::new();
/// let hit = counter.recorder();
/// hit();
/// hit();
/// assert_eq!(counter.count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct HitCounter {
    started: Instant,
    hits: Arc<Mutex<Vec<Instant>>>,
}

impl HitCounter {
    /// Create an empty counter; offsets are measured from this moment.
    pub fn new() -> Self {
        Self {
            started: TokioTimer.now(),
            hits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record one hit at the current instant.
    pub fn hit(&self) {
        self.hits.lock().push(TokioTimer.now());
    }

    /// A synchronous action that records a hit every time it is called.
    pub fn recorder(&self) -> impl Fn() + Send + Sync + 'static {
        let counter = self.clone();
        move || counter.hit()
    }

    /// Number of recorded hits.
    pub fn count(&self) -> usize {
        self.hits.lock().len()
    }

    /// Offset of every hit from the counter's creation, in order.
    pub fn offsets(&self) -> Vec<Duration> {
        self.hits
            .lock()
            .iter()
            .map(|hit| *hit - self.started)
            .collect()
    }

    /// Offset of the most recent hit, if any.
    pub fn last_offset(&self) -> Option<Duration> {
        self.offsets().last().copied()
    }
}

impl Default for HitCounter {
    fn default() -> Self {
        Self::new()
    }
}
