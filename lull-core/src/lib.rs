// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Building blocks for the lull debouncer: errors, cancellation, the lock-free
//! pending-work slot and the re-armable timer.

pub mod atomic_slot;
pub mod cancellation_token;
pub mod error;
#[cfg(feature = "runtime-tokio")]
pub mod retrigger_timer;
pub mod timer;

pub use self::atomic_slot::AtomicSlot;
pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::error::{DebounceError, IntoDebounceError, Result, ResultExt};
#[cfg(feature = "runtime-tokio")]
pub use self::retrigger_timer::RetriggerTimer;
pub use self::timer::Timer;
#[cfg(feature = "runtime-tokio")]
pub use self::timer::TokioTimer;
