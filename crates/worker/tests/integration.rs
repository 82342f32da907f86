//! Integration tests for the Redis job queue.
//!
//! Requires a running Redis with `REDIS_URL` env var set (defaults to
//! redis://localhost:6379). The tests share the queue keys, so run them
//! single-threaded:
//!
//! ```bash
//! REDIS_URL="redis://localhost:6379" \
//!   cargo test -p herald-worker --test integration -- --ignored --nocapture --test-threads=1
//! ```

use std::time::Duration;

use herald_common::redis_pool::create_redis_pool;
use herald_common::types::{JOB_TYPE_WELCOME_MESSAGE, WelcomeTask};
use herald_delivery::scheduler::RetryScheduler;
use herald_worker::queue::{Job, RedisTaskQueue};

/// Connect and clear the queue keys.
async fn setup() -> RedisTaskQueue {
    let url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let mut redis = create_redis_pool(&url).await.unwrap();

    let _: () = redis::cmd("DEL")
        .arg("herald:jobs:scheduled")
        .arg("herald:jobs:completed")
        .arg("herald:jobs:failed")
        .query_async(&mut redis)
        .await
        .unwrap();

    RedisTaskQueue::new(redis)
}

#[tokio::test]
#[ignore]
async fn test_pop_on_empty_queue_returns_none() {
    let queue = setup().await;
    assert!(queue.pop_due().await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn test_enqueue_then_pop_round_trip() {
    let queue = setup().await;
    let job = Job::welcome_message(WelcomeTask::new("12345", "alice"));

    queue.enqueue(&job).await.unwrap();
    let popped = queue.pop_due().await.unwrap().expect("job should be due");

    assert_eq!(popped, job);
    // Claimed exactly once
    assert!(queue.pop_due().await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn test_scheduled_job_is_not_due_before_its_delay() {
    let queue = setup().await;
    let job = Job::welcome_message(WelcomeTask::new("12345", "alice"));

    queue.schedule(&job, Duration::from_secs(60)).await.unwrap();

    assert!(
        queue.pop_due().await.unwrap().is_none(),
        "job scheduled 60s out must not be due yet"
    );
}

#[tokio::test]
#[ignore]
async fn test_schedule_retry_enqueues_annotated_welcome_job() {
    let queue = setup().await;
    let task = WelcomeTask::new("12345", "alice");

    queue
        .schedule_retry(&task, Duration::ZERO, 130)
        .await
        .unwrap();

    let job = queue.pop_due().await.unwrap().expect("retry should be due");
    assert_eq!(job.job_type, JOB_TYPE_WELCOME_MESSAGE);
    assert_eq!(job.payload.user_id, "12345");
    assert_eq!(job.payload.username, "alice");
    assert_eq!(
        job.payload.title.as_deref(),
        Some("Resend welcome message to @alice following an error 130")
    );
    assert!(job.remove_on_complete);
}

#[tokio::test]
#[ignore]
async fn test_oldest_due_job_pops_first() {
    let queue = setup().await;
    let first_in = Job::welcome_message(WelcomeTask::new("1", "first"));
    let second_in = Job::welcome_message(WelcomeTask::new("2", "second"));

    queue.enqueue(&first_in).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    queue.enqueue(&second_in).await.unwrap();

    let popped = queue.pop_due().await.unwrap().unwrap();
    assert_eq!(popped, first_in);
}
