use thiserror::Error;

use herald_common::error::AppError;

use crate::classifier::FatalCause;

/// Errors escalated from a welcome-message delivery attempt.
///
/// User-unreachable and transient provider failures are not errors from the
/// caller's perspective: the task performs the matching side effect (status
/// update / scheduled retry) and completes normally. Everything here means
/// the job failed and a human must look.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The user's context could not be loaded. Precondition failure,
    /// distinct from anything the provider returned; never classified.
    #[error("failed to resolve user {user_id}: {source}")]
    UserResolution {
        user_id: String,
        #[source]
        source: AppError,
    },

    /// The send failed without a structured provider response.
    /// Propagated unchanged; transport failures are never classified.
    #[error("transport failure during send: {0}")]
    Transport(#[source] anyhow::Error),

    /// The provider rejected the application itself.
    #[error("provider rejected the application: {0}")]
    FatalProvider(FatalCause),

    /// The provider returned a code the classifier does not map.
    /// Raw code and message preserved verbatim for operator diagnosis.
    #[error("an unexpected provider error occurred: {code} {message}")]
    UnknownProvider { code: u32, message: String },

    /// Persisting a category change failed.
    #[error("failed to update category for user {user_id}: {source}")]
    StatusUpdate {
        user_id: String,
        #[source]
        source: AppError,
    },

    /// Enqueueing the delayed retry failed. The scheduling itself is never
    /// retried.
    #[error("failed to schedule retry: {0}")]
    RetrySchedule(#[source] AppError),
}
