//! Unit tests for the cleanup job.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::SessionKey;
use crate::errors::StoreError;
use crate::services::token::{CleanupConfig, CleanupJob};
use crate::stores::{MockSessionStore, SessionStore, SessionSweeper};

struct CountingSweeper {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl SessionSweeper for CountingSweeper {
    async fn delete_expired(&self) -> Result<usize, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(StoreError::unavailable("sweep backend down"))
        } else {
            Ok(3)
        }
    }
}

#[tokio::test]
async fn test_run_once_reports_deleted_count() {
    let store = Arc::new(MockSessionStore::new());
    store
        .put(&SessionKey::new(1), "a", Duration::ZERO)
        .await
        .unwrap();
    store
        .put(&SessionKey::new(2), "b", Duration::from_secs(60))
        .await
        .unwrap();

    let job = CleanupJob::new(store.clone(), CleanupConfig::default());
    assert_eq!(job.run_once().await.unwrap(), 1);

    // Sweeps are idempotent; a second pass finds nothing.
    assert_eq!(job.run_once().await.unwrap(), 0);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_failed_sweep_surfaces_but_does_not_panic() {
    let sweeper = Arc::new(CountingSweeper {
        calls: AtomicUsize::new(0),
        fail: true,
    });
    let job = CleanupJob::new(sweeper.clone(), CleanupConfig::default());

    assert!(job.run_once().await.is_err());
    assert_eq!(sweeper.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_background_task_ticks_on_schedule() {
    let sweeper = Arc::new(CountingSweeper {
        calls: AtomicUsize::new(0),
        fail: false,
    });
    let job = Arc::new(CleanupJob::new(
        sweeper.clone(),
        CleanupConfig {
            interval_secs: 1,
            enabled: true,
        },
    ));

    tokio::time::pause();
    job.start_background_task();

    // The immediate startup tick is skipped; two intervals mean two sweeps.
    tokio::time::advance(std::time::Duration::from_millis(2100)).await;
    tokio::task::yield_now().await;

    assert!(sweeper.calls.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_disabled_job_never_runs() {
    let sweeper = Arc::new(CountingSweeper {
        calls: AtomicUsize::new(0),
        fail: false,
    });
    let job = Arc::new(CleanupJob::new(
        sweeper.clone(),
        CleanupConfig {
            interval_secs: 1,
            enabled: false,
        },
    ));

    job.start_background_task();
    tokio::task::yield_now().await;

    assert_eq!(sweeper.calls.load(Ordering::SeqCst), 0);
}
