// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use lull_core::DebounceError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects the errors handed to a debouncer's error handler.
#[derive(Clone, Debug, Default)]
pub struct ErrorLog {
    errors: Arc<Mutex<Vec<DebounceError>>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler to install with `DebouncerBuilder::on_error`.
    pub fn handler(&self) -> impl Fn(DebounceError) + Send + Sync + 'static {
        let errors = self.errors.clone();
        move |error| errors.lock().push(error)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    /// Snapshot of the collected errors, oldest first.
    pub fn errors(&self) -> Vec<DebounceError> {
        self.errors.lock().clone()
    }
}
