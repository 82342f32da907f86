//! Herald worker binary entrypoint.

use herald_common::config::AppConfig;
use herald_common::db;
use herald_common::redis_pool;
use herald_delivery::provider::HttpDirectMessenger;
use herald_delivery::task::WelcomeMessageTask;
use herald_delivery::users::PgUserStore;
use herald_worker::queue::RedisTaskQueue;
use herald_worker::runner::JobWorker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herald_worker=info,herald_delivery=debug".into()),
        )
        .json()
        .init();

    tracing::info!("Herald worker starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Connect to Redis
    let redis = redis_pool::create_redis_pool(&config.redis_url).await?;

    // The queue doubles as the retry scheduler for transient send failures
    let queue = RedisTaskQueue::new(redis);
    let welcome = WelcomeMessageTask::new(
        PgUserStore::new(pool),
        HttpDirectMessenger::new(config.provider_api_url.clone()),
        queue.clone(),
    );
    let worker = JobWorker::new(queue, welcome, config.worker_poll_interval_ms);

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        result = worker.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Job worker exited with error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Herald worker stopped.");
    Ok(())
}
