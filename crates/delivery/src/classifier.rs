//! Provider error classification: a pure decision table mapping the
//! messaging provider's numeric error codes to delivery outcomes.
//!
//! Fatal and Unknown both stop processing and escalate to the caller (the
//! scheduler treats them identically, a human must look), but stay distinct
//! for observability. Transient never escalates, it always resolves to a
//! scheduled retry. UserUnreachable never escalates, it always resolves to a
//! persisted status change.

use herald_common::types::UserCategory;

/// Root cause of an application-level provider rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalCause {
    /// The application's consumer credentials were rejected (code 32).
    InvalidCredentials,
    /// The provider revoked the application's access (code 416).
    AccessRevoked,
}

impl std::fmt::Display for FatalCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FatalCause::InvalidCredentials => write!(
                f,
                "authentication problems, check that the consumer key and secret are correct"
            ),
            FatalCause::AccessRevoked => {
                write!(f, "the application's access has been suspended by the provider")
            }
        }
    }
}

/// What a single provider error entry means for the delivery attempt.
///
/// Computed per entry and consumed immediately; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Application-level failure; escalate immediately.
    Fatal(FatalCause),
    /// The target user can no longer receive messages; persist the category.
    UserUnreachable(UserCategory),
    /// Provider-side or throttling failure expected to clear; retry later.
    Transient,
    /// Unmapped code; escalate with the raw code and message preserved.
    Unknown,
}

/// Classify a provider error code.
///
/// Total over all codes: anything unmapped is `Unknown` so new provider
/// codes surface to an operator instead of being silently swallowed.
pub const fn classify(code: u32) -> Outcome {
    match code {
        // app-related
        32 => Outcome::Fatal(FatalCause::InvalidCredentials),
        416 => Outcome::Fatal(FatalCause::AccessRevoked),
        // user-related
        89 => Outcome::UserUnreachable(UserCategory::Revoked),
        326 | 64 => Outcome::UserUnreachable(UserCategory::Suspended),
        // provider-side: over capacity, internal error, rate limit
        130 | 131 | 88 => Outcome::Transient,
        _ => Outcome::Unknown,
    }
}
