use crate::dispatch::BackgroundWork;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test]
async fn drain_waits_for_deferred_work() {
    // Arrange
    let done = Arc::new(AtomicUsize::new(0));
    let background = BackgroundWork::new();

    for _ in 0..3 {
        let done = done.clone();
        background.defer(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            done.fetch_add(1, Ordering::SeqCst);
        });
    }

    // Act
    background.drain().await;

    // Assert
    assert_eq!(done.load(Ordering::SeqCst), 3);
    assert_eq!(background.pending(), 0);
}

#[tokio::test]
async fn deferred_work_survives_dropping_the_registry() {
    // Arrange
    let done = Arc::new(AtomicUsize::new(0));

    {
        let background = BackgroundWork::new();
        let done = done.clone();
        background.defer(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            done.fetch_add(1, Ordering::SeqCst);
        });
    }

    // Act
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Assert
    assert_eq!(done.load(Ordering::SeqCst), 1);
}
