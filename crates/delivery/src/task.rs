//! Welcome-message delivery task.
//!
//! Orchestrates one job execution:
//! 1. Resolve the user's credentials and locale
//! 2. Render the localized welcome text
//! 3. Attempt the send
//! 4. On a structured provider failure, classify each error entry in
//!    provider order and apply the matching side effect

use std::time::Duration;

use herald_common::types::{ProviderErrorEntry, WelcomeTask};

use crate::classifier::{self, Outcome};
use crate::error::DeliveryError;
use crate::localize;
use crate::provider::{DirectMessenger, SendError};
use crate::scheduler::RetryScheduler;
use crate::users::UserStore;

/// Fixed delay before a transient provider failure is retried.
/// Exact, no jitter, so scheduling stays reproducible.
pub const RETRY_DELAY: Duration = Duration::from_secs(15 * 60);

/// Executes one welcome-message job against its collaborators.
pub struct WelcomeMessageTask<U, M, S> {
    users: U,
    messenger: M,
    scheduler: S,
}

impl<U, M, S> WelcomeMessageTask<U, M, S>
where
    U: UserStore,
    M: DirectMessenger,
    S: RetryScheduler,
{
    pub fn new(users: U, messenger: M, scheduler: S) -> Self {
        Self {
            users,
            messenger,
            scheduler,
        }
    }

    /// Run one delivery attempt.
    ///
    /// Returns `Ok(())` when the message was sent, or when every provider
    /// error entry resolved to a handled outcome (status updated and/or
    /// retry scheduled). Anything else escalates as a [`DeliveryError`].
    pub async fn run(&self, task: &WelcomeTask) -> Result<(), DeliveryError> {
        let credentials = self
            .users
            .dm_credentials(&task.user_id)
            .await
            .map_err(|source| DeliveryError::UserResolution {
                user_id: task.user_id.clone(),
                source,
            })?;
        let locale = self
            .users
            .locale(&task.user_id)
            .await
            .map_err(|source| DeliveryError::UserResolution {
                user_id: task.user_id.clone(),
                source,
            })?;

        let text = localize::welcome_text(&locale);

        match self
            .messenger
            .send_direct_message(&credentials, &task.user_id, text)
            .await
        {
            Ok(()) => {
                tracing::info!(username = %task.username, "Welcome message sent");
                Ok(())
            }
            // No structured error list attached: transport failures are
            // never classified.
            Err(SendError::Transport(err)) => Err(DeliveryError::Transport(err)),
            Err(SendError::Provider { errors }) => {
                self.handle_provider_errors(task, &errors).await
            }
        }
    }

    /// Classify each error entry in the order the provider returned them and
    /// apply its side effect.
    ///
    /// The first Fatal or Unknown entry short-circuits the remaining list; a
    /// single unrecoverable error invalidates further processing of the
    /// response. UserUnreachable and Transient entries are non-exclusive,
    /// several may fire from one response. Entries are awaited sequentially
    /// to preserve that ordering.
    async fn handle_provider_errors(
        &self,
        task: &WelcomeTask,
        errors: &[ProviderErrorEntry],
    ) -> Result<(), DeliveryError> {
        for entry in errors {
            match classifier::classify(entry.code) {
                Outcome::Fatal(cause) => return Err(DeliveryError::FatalProvider(cause)),
                Outcome::Unknown => {
                    return Err(DeliveryError::UnknownProvider {
                        code: entry.code,
                        message: entry.message.clone(),
                    });
                }
                Outcome::UserUnreachable(category) => {
                    tracing::warn!(
                        username = %task.username,
                        category = %category,
                        code = entry.code,
                        "User unreachable, updating category"
                    );
                    self.users
                        .set_category(&task.user_id, category)
                        .await
                        .map_err(|source| DeliveryError::StatusUpdate {
                            user_id: task.user_id.clone(),
                            source,
                        })?;
                }
                Outcome::Transient => {
                    tracing::warn!(
                        username = %task.username,
                        code = entry.code,
                        "Transient provider failure, scheduling retry"
                    );
                    self.scheduler
                        .schedule_retry(task, RETRY_DELAY, entry.code)
                        .await
                        .map_err(DeliveryError::RetrySchedule)?;
                }
            }
        }

        Ok(())
    }
}
