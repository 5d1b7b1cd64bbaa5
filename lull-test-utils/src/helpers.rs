// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use tokio::time::sleep;

/// Cushion added on top of a quiet period before asserting on its outcome.
pub const JITTER: Duration = Duration::from_millis(25);

/// Sleep for `ms` milliseconds plus [`JITTER`].
pub async fn pause_for(ms: u64) {
    sleep(Duration::from_millis(ms) + JITTER).await;
}

/// Assert that `actual` lies within `min..=max`.
///
/// # Panics
///
/// Panics when `actual` is out of range.
pub fn assert_elapsed_between(actual: Duration, min: Duration, max: Duration) {
    assert!(
        actual >= min && actual <= max,
        "elapsed {actual:?} not within {min:?}..={max:?}"
    );
}
