// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use lull::{CancellationToken, Debouncer};
use lull_test_utils::{assert_elapsed_between, pause_for, HitCounter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{pause, sleep};

const DELAY: Duration = Duration::from_millis(100);

#[tokio::test]
async fn test_executes_once_after_delay() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let counter = HitCounter::new();
    let hits = counter.clone();

    // Act
    debouncer.debounce(
        DELAY,
        move |_: CancellationToken| {
            let hits = hits.clone();
            async move {
                hits.hit();
                Ok(())
            }
        },
        false,
        None,
    )?;

    // Assert
    sleep(Duration::from_millis(90)).await;
    assert_eq!(counter.count(), 0);

    pause_for(10).await;
    assert_eq!(counter.count(), 1);
    assert_elapsed_between(
        counter.last_offset().expect("one hit"),
        DELAY,
        DELAY + Duration::from_millis(5),
    );

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_rapid_calls_collapse_to_single_execution() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let counter = HitCounter::new();

    // Act
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;
    sleep(Duration::from_millis(20)).await;
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;
    sleep(Duration::from_millis(20)).await;
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;

    pause_for(150).await;

    // Assert
    assert_eq!(counter.count(), 1);
    assert_elapsed_between(
        counter.last_offset().expect("one hit"),
        Duration::from_millis(140),
        Duration::from_millis(145),
    );

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_burst_without_pauses_yields_single_execution() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let counter = HitCounter::new();

    // Act
    for _ in 0..1_000 {
        debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;
    }
    pause_for(100).await;

    // Assert
    assert_eq!(counter.count(), 1);
    assert!(!debouncer.has_pending());

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_rearm_resets_the_clock() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let counter = HitCounter::new();

    // Act
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;
    sleep(Duration::from_millis(20)).await;
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;

    // Assert - nothing at the first deadline
    sleep(Duration::from_millis(85)).await;
    assert_eq!(counter.count(), 0);
    assert!(debouncer.has_pending());

    sleep(Duration::from_millis(20)).await;
    assert_eq!(counter.count(), 1);
    assert_elapsed_between(
        counter.last_offset().expect("one hit"),
        Duration::from_millis(120),
        Duration::from_millis(125),
    );

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_superseded_action_never_runs() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let first = HitCounter::new();
    let second = HitCounter::new();

    // Act
    debouncer.debounce_sync(DELAY, first.recorder(), false, None)?;
    sleep(Duration::from_millis(30)).await;
    debouncer.debounce_sync(DELAY, second.recorder(), false, None)?;
    pause_for(200).await;

    // Assert
    assert_eq!(first.count(), 0);
    assert_eq!(second.count(), 1);

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_separate_quiet_periods_each_execute() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let counter = HitCounter::new();

    // Act
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;
    pause_for(100).await;
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;
    pause_for(100).await;

    // Assert
    assert_eq!(counter.count(), 2);

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_latest_delay_wins() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let counter = HitCounter::new();

    // Act
    debouncer.debounce_sync(Duration::from_millis(500), counter.recorder(), false, None)?;
    debouncer.debounce_sync(Duration::from_millis(50), counter.recorder(), false, None)?;
    pause_for(50).await;

    // Assert
    assert_eq!(counter.count(), 1);
    assert_elapsed_between(
        counter.last_offset().expect("one hit"),
        Duration::from_millis(50),
        Duration::from_millis(55),
    );

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_zero_delay_runs_on_next_tick() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let counter = HitCounter::new();

    // Act
    debouncer.debounce_sync(Duration::ZERO, counter.recorder(), false, None)?;

    // Assert
    assert_eq!(counter.count(), 0);
    pause_for(0).await;
    assert_eq!(counter.count(), 1);

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_sync_with_token_receives_submission_token() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    let token = CancellationToken::new();
    let observed = Arc::new(AtomicUsize::new(0));
    let observed_clone = observed.clone();
    let expected = token.clone();

    // Act
    debouncer.debounce_sync_with_token(
        DELAY,
        move |received: CancellationToken| {
            // cancelling the received token is visible through the caller's clone
            received.cancel();
            if expected.is_cancelled() {
                observed_clone.fetch_add(1, Ordering::SeqCst);
            }
        },
        false,
        Some(token.clone()),
    )?;
    pause_for(100).await;

    // Assert
    assert_eq!(observed.load(Ordering::SeqCst), 1);
    assert!(token.is_cancelled());

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_state_accessors_follow_lifecycle() -> anyhow::Result<()> {
    // Arrange
    pause();
    let debouncer = Debouncer::new();
    assert!(!debouncer.has_pending());
    assert!(!debouncer.is_executing());

    // Act
    debouncer.debounce(
        Duration::from_millis(10),
        |_: CancellationToken| async {
            sleep(Duration::from_millis(100)).await;
            Ok(())
        },
        false,
        None,
    )?;
    assert!(debouncer.has_pending());

    sleep(Duration::from_millis(50)).await;

    // Assert
    assert!(!debouncer.has_pending());
    assert!(debouncer.is_executing());

    pause_for(100).await;
    assert!(!debouncer.is_executing());

    debouncer.dispose().await?;
    assert!(debouncer.is_disposed());
    Ok(())
}
