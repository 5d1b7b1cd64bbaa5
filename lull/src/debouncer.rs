// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Trailing (and optionally leading) debounce of caller-supplied actions.
//!
//! # Runtime Requirements
//!
//! A [`Debouncer`] runs its timer on a tokio task. It captures the runtime it is
//! built on, so submissions may come from any thread afterwards.
//!
//! # Concurrency
//!
//! The pending submission lives in a lock-free slot; every submission swaps
//! itself in and every timer fire swaps it out, so a submission is consumed at
//! most once. Only the most recent execution is tracked: a leading execution
//! that is still running when the trailing one starts is no longer awaited by
//! [`dispose`](Debouncer::dispose).

pub(crate) mod implementation;

use crate::debouncer::implementation::{ActionFn, ErrorHandler, PendingWork, State};
use core::future::Future;
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use futures::future::{self, BoxFuture, FutureExt};
use lull_core::{CancellationToken, DebounceError, Result, RetriggerTimer, Timer, TokioTimer};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Delays execution of an action until a quiet period has passed without a
/// new submission.
///
/// Each call to [`debounce`](Debouncer::debounce) replaces the pending action
/// and restarts the countdown. When the countdown elapses the latest action
/// runs once. With `run_leading` the first submission of a quiet period also
/// runs immediately.
///
/// # Example
///
/// ```
/// use lull::{CancellationToken, Debouncer};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> lull::Result<()> {
/// let debouncer = Debouncer::new();
/// let saves = Arc::new(AtomicUsize::new(0));
///
/// for _ in 0..5 {
///     let saves = saves.clone();
///     debouncer.debounce(
///         Duration::from_millis(20),
///         move |_token: CancellationToken| {
///             let saves = saves.clone();
///             async move {
///                 saves.fetch_add(1, Ordering::SeqCst);
///                 Ok(())
///             }
///         },
///         false,
///         None,
///     )?;
/// }
///
/// tokio::time::sleep(Duration::from_millis(60)).await;
/// assert_eq!(saves.load(Ordering::SeqCst), 1);
///
/// debouncer.dispose().await
/// # }
/// ```
pub struct Debouncer {
    state: Arc<State>,
    timer: RetriggerTimer,
    disposed: AtomicBool,
}

impl Debouncer {
    /// Create a debouncer on the current tokio runtime with the default
    /// error handler, which logs faults nobody awaits.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a debouncer.
    pub fn builder() -> DebouncerBuilder {
        DebouncerBuilder::default()
    }

    /// Submit `action` to run once `delay` has passed without another submission.
    ///
    /// # Arguments
    ///
    /// * `delay` - Quiet period; restarts on every submission
    /// * `action` - Async action, called with the submission's token
    /// * `run_leading` - Also run `action` right away if nothing is pending or
    ///   executing. The leading run is not awaited; its synchronous part has
    ///   completed when this returns.
    /// * `cancellation_token` - Cancels this submission's trailing execution
    ///   if it has not started yet. `None` means never cancelled.
    ///
    /// Submission never blocks and never waits for the action.
    ///
    /// # Errors
    ///
    /// Returns `DebounceError::Disposed` after [`dispose`](Debouncer::dispose),
    /// including when a concurrent dispose wins the race, or
    /// `DebounceError::TimerError` if the timer task is gone.
    pub fn debounce<F, Fut>(
        &self,
        delay: Duration,
        action: F,
        run_leading: bool,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        if self.disposed.load(Ordering::Acquire) {
            return Err(DebounceError::Disposed);
        }

        let action: Arc<ActionFn> =
            Arc::new(move |token: CancellationToken| -> BoxFuture<'static, Result<()>> {
                action(token).boxed()
            });
        let token = cancellation_token.unwrap_or_default();

        let previous = self.state.pending.swap(Some(PendingWork {
            action: action.clone(),
            token: token.clone(),
        }));

        // A dispose that raced the swap may already have drained the slot.
        if self.disposed.load(Ordering::Acquire) {
            drop(self.state.pending.take());
            return Err(DebounceError::Disposed);
        }

        match previous {
            None => {
                if run_leading && !self.state.is_executing() {
                    self.state.fire_and_forget(action, token);
                }
            }
            Some(_superseded) => {
                debug!("lull: pending action superseded, restarting quiet period");
            }
        }

        self.timer.arm(delay).map_err(|error| {
            if self.is_disposed() {
                drop(self.state.pending.take());
                DebounceError::Disposed
            } else {
                error
            }
        })
    }

    /// [`debounce`](Debouncer::debounce) for a synchronous action that takes
    /// the submission's token.
    ///
    /// # Errors
    ///
    /// Same as [`debounce`](Debouncer::debounce).
    pub fn debounce_sync_with_token<F>(
        &self,
        delay: Duration,
        action: F,
        run_leading: bool,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(CancellationToken) + Send + Sync + 'static,
    {
        self.debounce(
            delay,
            move |token| {
                action(token);
                future::ready(Ok(()))
            },
            run_leading,
            cancellation_token,
        )
    }

    /// [`debounce`](Debouncer::debounce) for a synchronous action without
    /// parameters.
    ///
    /// # Errors
    ///
    /// Same as [`debounce`](Debouncer::debounce).
    pub fn debounce_sync<F>(
        &self,
        delay: Duration,
        action: F,
        run_leading: bool,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.debounce(
            delay,
            move |_| {
                action();
                future::ready(Ok(()))
            },
            run_leading,
            cancellation_token,
        )
    }

    /// Whether a submission is waiting for its quiet period to elapse.
    pub fn has_pending(&self) -> bool {
        self.state.pending.is_occupied()
    }

    /// Whether an execution is currently tracked as running.
    pub fn is_executing(&self) -> bool {
        self.state.is_executing()
    }

    /// Whether [`dispose`](Debouncer::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Stop the timer, drop pending work and wait for the running execution.
    ///
    /// The timer task has exited before the running execution is awaited, so
    /// no new execution can start once this has been called. Pending work is discarded without
    /// running. Only the first call does anything; later calls return `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns the fault of the awaited execution, unless it is
    /// `DebounceError::Cancelled`, or `DebounceError::TimerError` if the timer
    /// task panicked.
    pub async fn dispose(&self) -> Result<()> {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let timer_stopped = self.timer.shutdown().await;
        if let Err(error) = &timer_stopped {
            warn!("lull: timer task ended abnormally: {error}");
        }

        if let Some(execution) = self.state.drain() {
            debug!("lull: waiting for running action before dispose completes");
            match execution.await {
                Ok(()) | Err(DebounceError::Cancelled) => {}
                Err(error) => return Err(error),
            }
        }

        timer_stopped
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &self.has_pending())
            .field("executing", &self.is_executing())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

/// Configures and builds a [`Debouncer`].
///
/// ```
/// use lull::{Debouncer, TokioTimer};
///
/// # #[tokio::main]
/// # async fn main() {
/// let debouncer = Debouncer::builder()
///     .timer(TokioTimer)
///     .on_error(|error| eprintln!("debounced flush failed: {error}"))
///     .build();
/// # drop(debouncer);
/// # }
/// ```
pub struct DebouncerBuilder<TM = TokioTimer> {
    timer: TM,
    on_error: Box<ErrorHandler>,
}

impl Default for DebouncerBuilder<TokioTimer> {
    fn default() -> Self {
        Self {
            timer: TokioTimer,
            on_error: Box::new(|error| {
                error!("lull: debounced action failed with nobody awaiting it: {error}");
            }),
        }
    }
}

impl<TM: Timer> DebouncerBuilder<TM> {
    /// Schedule against `timer` instead of `tokio::time`.
    pub fn timer<T: Timer>(self, timer: T) -> DebouncerBuilder<T> {
        DebouncerBuilder {
            timer,
            on_error: self.on_error,
        }
    }

    /// Receive faults of executions nobody awaits.
    ///
    /// Leading executions are never awaited, and trailing executions are only
    /// awaited by a concurrent [`dispose`](Debouncer::dispose). Their faults,
    /// panics included, are passed here instead of being lost.
    pub fn on_error<H>(mut self, handler: H) -> Self
    where
        H: Fn(DebounceError) + Send + Sync + 'static,
    {
        self.on_error = Box::new(handler);
        self
    }

    /// Build the debouncer and spawn its timer task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn build(self) -> Debouncer {
        let runtime = Handle::current();
        let _entered = runtime.enter();
        let state = Arc::new(State::new(self.on_error, runtime.clone()));

        let tick_state = state.clone();
        let timer = RetriggerTimer::spawn(self.timer, move || tick_state.clone().tick());

        Debouncer {
            state,
            timer,
            disposed: AtomicBool::new(false),
        }
    }
}
