//! Retry scheduling seam against the task scheduler.
//!
//! The queue mechanics themselves (persistence, pickup, execution) live in
//! the worker crate; the engine only needs a way to re-enqueue a
//! semantically identical job after a fixed delay.

use std::time::Duration;

use async_trait::async_trait;

use herald_common::error::AppError;
use herald_common::types::WelcomeTask;

/// Re-enqueues a welcome-message job after a transient provider failure.
#[async_trait]
pub trait RetryScheduler: Send + Sync {
    /// Enqueue a job carrying the same `user_id`/`username` as `task`, due
    /// after `delay`, its title annotated with the provider code that
    /// triggered the retry. The job record is discarded once the retry
    /// eventually completes.
    ///
    /// A failure to enqueue escalates to the caller; the scheduling itself
    /// is never retried.
    async fn schedule_retry(
        &self,
        task: &WelcomeTask,
        delay: Duration,
        reason_code: u32,
    ) -> Result<(), AppError>;
}
