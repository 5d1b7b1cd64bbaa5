// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use lull::{CancellationToken, DebounceError, Debouncer, TokioTimer};
use lull_test_utils::{pause_for, ErrorLog, HitCounter, TestError};
use std::time::Duration;
use tokio::time::pause;

const DELAY: Duration = Duration::from_millis(50);

async fn explode_later() -> lull::Result<()> {
    tokio::time::sleep(Duration::from_millis(5)).await;
    panic!("async boom")
}

#[tokio::test]
async fn test_trailing_failure_is_reported() -> anyhow::Result<()> {
    // Arrange
    pause();
    let errors = ErrorLog::new();
    let debouncer = Debouncer::builder().on_error(errors.handler()).build();

    // Act
    debouncer.debounce(
        DELAY,
        |_: CancellationToken| async {
            Err(DebounceError::action_failed(TestError::new("disk full")))
        },
        false,
        None,
    )?;
    pause_for(50).await;

    // Assert
    let reported = errors.errors();
    assert_eq!(reported.len(), 1);
    assert!(matches!(reported[0], DebounceError::ActionFailed(_)));
    assert_eq!(reported[0].to_string(), "Action error: Test error: disk full");

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_trailing_panic_is_contained() -> anyhow::Result<()> {
    // Arrange
    pause();
    let errors = ErrorLog::new();
    let debouncer = Debouncer::builder().on_error(errors.handler()).build();
    let counter = HitCounter::new();

    // Act
    debouncer.debounce_sync(DELAY, || panic!("boom"), false, None)?;
    pause_for(50).await;
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;
    pause_for(50).await;

    // Assert
    let reported = errors.errors();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].to_string(), "Action panicked: boom");
    assert_eq!(counter.count(), 1);
    assert!(!debouncer.is_executing());

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_panic_inside_async_action_is_contained() -> anyhow::Result<()> {
    // Arrange
    pause();
    let errors = ErrorLog::new();
    let debouncer = Debouncer::builder().on_error(errors.handler()).build();

    // Act
    debouncer.debounce(
        DELAY,
        |_: CancellationToken| explode_later(),
        false,
        None,
    )?;
    pause_for(50).await;

    // Assert
    let reported = errors.errors();
    assert_eq!(reported.len(), 1);
    assert!(matches!(reported[0], DebounceError::Panicked { .. }));
    assert_eq!(reported[0].to_string(), "Action panicked: async boom");

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_leading_panic_does_not_fail_submission() -> anyhow::Result<()> {
    // Arrange
    pause();
    let errors = ErrorLog::new();
    let debouncer = Debouncer::builder().on_error(errors.handler()).build();

    // Act
    let submitted = debouncer.debounce_sync(DELAY, || panic!("leading boom"), true, None);

    // Assert
    assert!(submitted.is_ok());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].to_string(), "Action panicked: leading boom");

    // trailing run panics as well
    pause_for(50).await;
    assert_eq!(errors.len(), 2);

    debouncer.dispose().await?;
    Ok(())
}

#[tokio::test]
async fn test_builder_with_explicit_timer() -> anyhow::Result<()> {
    // Arrange
    pause();
    let errors = ErrorLog::new();
    let debouncer = Debouncer::builder()
        .timer(TokioTimer)
        .on_error(errors.handler())
        .build();
    let counter = HitCounter::new();

    // Act
    debouncer.debounce_sync(DELAY, counter.recorder(), false, None)?;
    pause_for(50).await;

    // Assert
    assert_eq!(counter.count(), 1);
    assert!(errors.is_empty());

    debouncer.dispose().await?;
    Ok(())
}
