// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One-shot, re-armable timer running on its own task.
//!
//! The timer task owns at most one sleep future. Every [`arm`](RetriggerTimer::arm)
//! replaces it with a fresh one, so the countdown restarts. When a sleep
//! completes the fire callback is spawned as an independent task and the timer
//! goes back to being disarmed.

use crate::{CancellationToken, DebounceError, Result, Timer};
use core::future::Future;
use core::pin::Pin;
use core::time::Duration;
use futures::StreamExt;
use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Handle to a running re-armable timer task.
///
/// Dropping the handle stops the task without waiting for it; use
/// [`shutdown`](RetriggerTimer::shutdown) to also wait until it has exited.
#[derive(Debug)]
pub struct RetriggerTimer {
    commands: UnboundedSender<Duration>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RetriggerTimer {
    /// Spawn a disarmed timer task on the current tokio runtime.
    ///
    /// `on_fire` is called every time an armed window elapses without being
    /// re-armed. Each returned future is spawned on its own, so a slow
    /// callback never delays the next fire.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn<TM, F, Fut>(timer: TM, on_fire: F) -> Self
    where
        TM: Timer,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (commands, receiver) = unbounded();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(timer, receiver, cancel.clone(), on_fire));

        Self {
            commands,
            cancel,
            task: Mutex::new(Some(task)),
        }
    }

    /// Arm the timer to fire once after `delay`, discarding any earlier window.
    ///
    /// # Errors
    /// Returns `DebounceError::TimerError` if the timer task has stopped.
    pub fn arm(&self, delay: Duration) -> Result<()> {
        self.commands
            .unbounded_send(delay)
            .map_err(|_| DebounceError::timer_error("timer task is no longer running"))
    }

    /// Whether [`shutdown`](RetriggerTimer::shutdown) has been requested or the
    /// handle is being dropped.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop the timer task and wait for it to exit.
    ///
    /// Once this returns no further fire callback will be spawned. Callbacks
    /// spawned before the call keep running.
    ///
    /// # Errors
    /// Returns `DebounceError::TimerError` if the timer task panicked.
    pub async fn shutdown(&self) -> Result<()> {
        self.cancel.cancel();

        let task = self.task.lock().take();
        match task {
            Some(task) => task
                .await
                .map_err(|e| DebounceError::timer_error(e.to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for RetriggerTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<TM, F, Fut>(
    timer: TM,
    mut commands: UnboundedReceiver<Duration>,
    cancel: CancellationToken,
    on_fire: F,
) where
    TM: Timer,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut sleep: Option<Pin<Box<TM::Sleep>>> = None;

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            command = commands.next() => match command {
                Some(delay) => sleep = Some(Box::pin(timer.sleep_future(delay))),
                None => break,
            },

            () = async {
                if let Some(pending) = sleep.as_mut() {
                    pending.await;
                }
            }, if sleep.is_some() => {
                sleep = None;
                tokio::spawn(on_fire());
            }
        }
    }
}
