// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the lull debouncer.
//!
//! Designed for use in development and testing only.
//!
//! - [`HitCounter`] records when a debounced action ran
//! - [`ErrorLog`] collects faults passed to a debouncer's error handler
//! - [`helpers`] has timing helpers tuned for `tokio::time::pause`
//! - [`TestError`] is a ready-made user error for failing actions

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error_log;
pub mod helpers;
pub mod hit_counter;

pub use error_log::ErrorLog;
pub use helpers::{assert_elapsed_between, pause_for, JITTER};
pub use hit_counter::HitCounter;

/// User error returned by failing test actions.
#[derive(Debug, thiserror::Error)]
#[error("Test error: {0}")]
pub struct TestError(pub String);

impl TestError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
