// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::panic::AssertUnwindSafe;
use futures::future::{BoxFuture, FutureExt, Shared};
use lull_core::{AtomicSlot, CancellationToken, DebounceError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;

pub(crate) type ActionFn =
    dyn Fn(CancellationToken) -> BoxFuture<'static, Result<()>> + Send + Sync;

pub(crate) type ErrorHandler = dyn Fn(DebounceError) + Send + Sync;

/// Awaitable outcome of one action invocation, shared with a disposer.
pub(crate) type Execution = Shared<BoxFuture<'static, Result<()>>>;

/// The most recent submission, waiting for its quiet period to elapse.
pub(crate) struct PendingWork {
    pub(crate) action: Arc<ActionFn>,
    pub(crate) token: CancellationToken,
}

pub(crate) struct State {
    pub(crate) pending: AtomicSlot<PendingWork>,
    pub(crate) running: Mutex<Option<Execution>>,
    pub(crate) on_error: Box<ErrorHandler>,
    pub(crate) runtime: Handle,
}

impl State {
    pub(crate) fn new(on_error: Box<ErrorHandler>, runtime: Handle) -> Self {
        Self {
            pending: AtomicSlot::new(),
            running: Mutex::new(None),
            on_error,
            runtime,
        }
    }

    pub(crate) fn is_executing(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Hands a fault nobody awaits to the error handler.
    pub(crate) fn report(&self, error: DebounceError) {
        (self.on_error)(error);
    }

    /// Timer callback: consume the pending work, if any, and run it.
    ///
    /// The pending slot is drained under the running lock, so a concurrent
    /// disposer either finds the work still pending or finds it tracked.
    pub(crate) async fn tick(self: Arc<Self>) {
        let (execution, token) = {
            let mut running = self.running.lock();
            let Some(work) = self.pending.take() else {
                return;
            };

            if work.token.is_cancelled() {
                debug!("lull: pending action cancelled before its quiet period elapsed");
                return;
            }

            let execution = invoke(work.action, work.token.clone());
            *running = Some(execution.clone());
            (execution, work.token)
        };

        if let Err(error) = self.clone().finish(execution, token).await {
            self.report(error);
        }
    }

    /// Start `action` without awaiting it.
    ///
    /// The execution is polled once on the calling thread, so synchronous work
    /// has happened by the time this returns. Whatever remains is spawned.
    pub(crate) fn fire_and_forget(self: &Arc<Self>, action: Arc<ActionFn>, token: CancellationToken) {
        let _runtime = self.runtime.enter();
        let execution = self.track(action, token.clone());
        let mut run = Box::pin(self.clone().finish(execution, token));

        match (&mut run).now_or_never() {
            Some(Ok(())) => {}
            Some(Err(error)) => self.report(error),
            None => {
                let state = self.clone();
                self.runtime.spawn(async move {
                    if let Err(error) = run.await {
                        state.report(error);
                    }
                });
            }
        }
    }

    /// Drop pending work and return the tracked execution, if any.
    ///
    /// Both happen under the running lock, pairing with [`tick`](State::tick).
    pub(crate) fn drain(&self) -> Option<Execution> {
        let running = self.running.lock();
        if self.pending.take().is_some() {
            debug!("lull: dropped pending action on dispose");
        }
        running.clone()
    }

    /// Register a not yet started invocation of `action` as the running execution.
    fn track(&self, action: Arc<ActionFn>, token: CancellationToken) -> Execution {
        let execution = invoke(action, token);
        *self.running.lock() = Some(execution.clone());
        execution
    }

    /// Drive a tracked execution to completion.
    ///
    /// A `Cancelled` outcome is swallowed when the caller's own token was
    /// cancelled; every other outcome is returned as is.
    async fn finish(self: Arc<Self>, execution: Execution, token: CancellationToken) -> Result<()> {
        let outcome = execution.await;

        // Only the latest execution is tracked, so this may clear a newer one.
        *self.running.lock() = None;

        match outcome {
            Err(DebounceError::Cancelled) if token.is_cancelled() => Ok(()),
            other => other,
        }
    }
}

/// Wrap a call of the action into a lazy, shareable execution.
///
/// Nothing runs until the execution is first polled, the synchronous part of
/// the action included. Panics on either side of the call become
/// `DebounceError::Panicked`.
fn invoke(action: Arc<ActionFn>, token: CancellationToken) -> Execution {
    async move {
        match std::panic::catch_unwind(AssertUnwindSafe(|| action(token))) {
            Ok(future) => AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(DebounceError::from_panic(payload.as_ref()))),
            Err(payload) => Err(DebounceError::from_panic(payload.as_ref())),
        }
    }
    .boxed()
    .shared()
}
