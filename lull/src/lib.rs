// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Debounce primitive for async Rust.
//!
//! A [`Debouncer`] delays a caller-supplied action until a quiet period has
//! elapsed without a new submission, collapsing bursts of calls into a single
//! trailing execution (plus an optional leading one).
//!
//! ```
//! use lull::Debouncer;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> lull::Result<()> {
//! let debouncer = Debouncer::new();
//!
//! for _ in 0..10 {
//!     debouncer.debounce_sync(Duration::from_millis(50), || println!("settled"), false, None)?;
//! }
//!
//! tokio::time::sleep(Duration::from_millis(100)).await;
//! debouncer.dispose().await
//! # }
//! ```

#[macro_use]
mod logging;

pub mod debouncer;

pub use debouncer::{Debouncer, DebouncerBuilder};
pub use lull_core::{
    CancellationToken, DebounceError, IntoDebounceError, Result, ResultExt, Timer, TokioTimer,
};
