//! User record store: resolves send credentials and locale, persists
//! category changes.

use async_trait::async_trait;
use sqlx::PgPool;

use herald_common::error::AppError;
use herald_common::types::{DmCredentials, UserCategory};

/// Read/write access to the user records the delivery engine needs.
///
/// Only `category` is ever written; credentials and locale are read-only.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Resolve the user's send-capable credentials.
    async fn dm_credentials(&self, user_id: &str) -> Result<DmCredentials, AppError>;

    /// Resolve the user's locale code.
    async fn locale(&self, user_id: &str) -> Result<String, AppError>;

    /// Persist a new reachability category.
    ///
    /// Idempotent set, not a guarded state transition: one provider response
    /// can carry multiple entries targeting the same category, and the last
    /// write wins.
    async fn set_category(&self, user_id: &str, category: UserCategory) -> Result<(), AppError>;
}

/// PostgreSQL-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn dm_credentials(&self, user_id: &str) -> Result<DmCredentials, AppError> {
        let credentials: DmCredentials =
            sqlx::query_as("SELECT access_token FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(credentials)
    }

    async fn locale(&self, user_id: &str) -> Result<String, AppError> {
        let row: (String,) = sqlx::query_as("SELECT locale FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(row.0)
    }

    async fn set_category(&self, user_id: &str, category: UserCategory) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET category = $1, updated_at = now() WHERE id = $2")
            .bind(category.to_string())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = %user_id, category = %category, "User category updated");
        Ok(())
    }
}
