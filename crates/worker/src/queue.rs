//! Redis-backed delayed job queue.
//!
//! Jobs are serialized envelopes in a sorted set scored by their due time in
//! epoch milliseconds. Scheduling with a delay is a ZADD at now + delay;
//! popping is a ZRANGEBYSCORE bounded by now followed by a ZREM. The ZREM
//! reply arbitrates between concurrent workers: whoever removes the member
//! owns the job.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use herald_common::error::AppError;
use herald_common::types::{JOB_TYPE_WELCOME_MESSAGE, WelcomeTask};
use herald_delivery::scheduler::RetryScheduler;

const SCHEDULED_KEY: &str = "herald:jobs:scheduled";
const COMPLETED_KEY: &str = "herald:jobs:completed";
const FAILED_KEY: &str = "herald:jobs:failed";

/// A queued job envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub job_type: String,
    pub payload: WelcomeTask,
    /// Discard the job record once it completes successfully, instead of
    /// retaining it for inspection.
    pub remove_on_complete: bool,
}

impl Job {
    /// First-attempt welcome message job. The record is retained on
    /// completion; only retries are flagged remove-on-complete.
    pub fn welcome_message(payload: WelcomeTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_type: JOB_TYPE_WELCOME_MESSAGE.to_string(),
            payload,
            remove_on_complete: false,
        }
    }
}

/// Redis-backed queue of delayed jobs, shared by the worker loop (pop side)
/// and the delivery engine's retry scheduling (push side).
#[derive(Clone)]
pub struct RedisTaskQueue {
    redis: ConnectionManager,
}

impl RedisTaskQueue {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Enqueue a job due immediately.
    pub async fn enqueue(&self, job: &Job) -> Result<(), AppError> {
        self.schedule_at(job, Self::now_ms()).await
    }

    /// Enqueue a job due after `delay`.
    pub async fn schedule(&self, job: &Job, delay: Duration) -> Result<(), AppError> {
        self.schedule_at(job, Self::now_ms() + delay.as_millis() as i64)
            .await
    }

    async fn schedule_at(&self, job: &Job, due_ms: i64) -> Result<(), AppError> {
        let member = serde_json::to_string(job)?;
        let mut redis = self.redis.clone();

        let _: () = redis::cmd("ZADD")
            .arg(SCHEDULED_KEY)
            .arg(due_ms)
            .arg(member)
            .query_async(&mut redis)
            .await?;

        tracing::debug!(job_id = %job.id, job_type = %job.job_type, due_ms, "Job scheduled");
        Ok(())
    }

    /// Pop the oldest due job, if any.
    pub async fn pop_due(&self) -> Result<Option<Job>, AppError> {
        let mut redis = self.redis.clone();
        let now = Self::now_ms();

        loop {
            // Oldest due member first
            let due: Vec<String> = redis::cmd("ZRANGEBYSCORE")
                .arg(SCHEDULED_KEY)
                .arg("-inf")
                .arg(now)
                .arg("LIMIT")
                .arg(0)
                .arg(1)
                .query_async(&mut redis)
                .await?;

            let Some(member) = due.into_iter().next() else {
                return Ok(None);
            };

            let removed: i64 = redis::cmd("ZREM")
                .arg(SCHEDULED_KEY)
                .arg(&member)
                .query_async(&mut redis)
                .await?;

            if removed == 0 {
                // Another worker claimed it; try the next due member.
                continue;
            }

            let job: Job = serde_json::from_str(&member)?;
            return Ok(Some(job));
        }
    }

    /// Record a successful run. Remove-on-complete jobs vanish; others are
    /// retained on the completed list.
    pub async fn complete(&self, job: &Job) -> Result<(), AppError> {
        if job.remove_on_complete {
            tracing::debug!(job_id = %job.id, "Job completed, record discarded");
            return Ok(());
        }

        let member = serde_json::to_string(job)?;
        let mut redis = self.redis.clone();
        let _: () = redis::cmd("LPUSH")
            .arg(COMPLETED_KEY)
            .arg(member)
            .query_async(&mut redis)
            .await?;

        Ok(())
    }

    /// Dead-letter a permanently failed job together with its error.
    pub async fn fail(&self, job: &Job, error: &str) -> Result<(), AppError> {
        let entry = serde_json::to_string(&serde_json::json!({ "job": job, "error": error }))?;
        let mut redis = self.redis.clone();
        let _: () = redis::cmd("LPUSH")
            .arg(FAILED_KEY)
            .arg(entry)
            .query_async(&mut redis)
            .await?;

        tracing::debug!(job_id = %job.id, "Job dead-lettered");
        Ok(())
    }
}

#[async_trait]
impl RetryScheduler for RedisTaskQueue {
    async fn schedule_retry(
        &self,
        task: &WelcomeTask,
        delay: Duration,
        reason_code: u32,
    ) -> Result<(), AppError> {
        let job = Job {
            id: Uuid::new_v4(),
            job_type: JOB_TYPE_WELCOME_MESSAGE.to_string(),
            payload: task.retry(reason_code),
            remove_on_complete: true,
        };
        self.schedule(&job, delay).await?;

        tracing::info!(
            job_id = %job.id,
            username = %task.username,
            reason_code,
            delay_ms = delay.as_millis() as u64,
            "Retry scheduled"
        );
        Ok(())
    }
}
