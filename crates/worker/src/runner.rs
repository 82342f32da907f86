//! Job worker: polls the queue and executes due jobs.
//!
//! Each job is processed by exactly one worker invocation; multiple workers
//! may run concurrently across different jobs (the queue's pop arbitrates
//! claims). Handled outcomes complete the job; anything that escalates from
//! the delivery engine is logged and dead-lettered for an operator.

use std::time::Duration;

use herald_common::types::JOB_TYPE_WELCOME_MESSAGE;
use herald_delivery::provider::HttpDirectMessenger;
use herald_delivery::task::WelcomeMessageTask;
use herald_delivery::users::PgUserStore;

use crate::queue::{Job, RedisTaskQueue};

/// Polls the delayed-job queue and runs each due job to completion.
pub struct JobWorker {
    queue: RedisTaskQueue,
    welcome: WelcomeMessageTask<PgUserStore, HttpDirectMessenger, RedisTaskQueue>,
    poll_interval: Duration,
}

impl JobWorker {
    pub fn new(
        queue: RedisTaskQueue,
        welcome: WelcomeMessageTask<PgUserStore, HttpDirectMessenger, RedisTaskQueue>,
        poll_interval_ms: u64,
    ) -> Self {
        Self {
            queue,
            welcome,
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }

    /// Start the polling loop. Runs indefinitely until the task is cancelled.
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Job worker started"
        );

        loop {
            match self.queue.pop_due().await {
                Ok(Some(job)) => self.process(job).await,
                Ok(None) => tokio::time::sleep(self.poll_interval).await,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to poll job queue");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// Execute one job and record its outcome.
    async fn process(&self, job: Job) {
        match job.job_type.as_str() {
            JOB_TYPE_WELCOME_MESSAGE => match self.welcome.run(&job.payload).await {
                Ok(()) => {
                    tracing::info!(job_id = %job.id, username = %job.payload.username, "Job completed");
                    if let Err(e) = self.queue.complete(&job).await {
                        tracing::error!(job_id = %job.id, error = %e, "Failed to record job completion");
                    }
                }
                Err(e) => {
                    tracing::error!(
                        job_id = %job.id,
                        username = %job.payload.username,
                        error = %e,
                        "Welcome message delivery failed"
                    );
                    if let Err(e) = self.queue.fail(&job, &e.to_string()).await {
                        tracing::error!(job_id = %job.id, error = %e, "Failed to dead-letter job");
                    }
                }
            },
            other => {
                tracing::warn!(job_id = %job.id, job_type = %other, "Unknown job type, dead-lettering");
                if let Err(e) = self.queue.fail(&job, "unknown job type").await {
                    tracing::error!(job_id = %job.id, error = %e, "Failed to dead-letter job");
                }
            }
        }
    }
}
