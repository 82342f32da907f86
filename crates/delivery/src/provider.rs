//! Messaging-provider client.
//!
//! The provider exposes one opaque "create direct message" operation. A
//! rejected send surfaces the provider's structured error list; anything
//! that fails without that structure (network, timeouts, unrecognized
//! bodies) is a transport failure and is never classified.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use herald_common::types::{DmCredentials, ProviderErrorEntry};

/// How a send attempt failed.
#[derive(Debug, Error)]
pub enum SendError {
    /// The provider rejected the send with structured error entries.
    #[error("provider rejected the send with {} error entries", .errors.len())]
    Provider { errors: Vec<ProviderErrorEntry> },

    /// The attempt never produced a structured provider response.
    #[error("transport failure: {0}")]
    Transport(#[from] anyhow::Error),
}

/// Sends direct messages on behalf of a user.
#[async_trait]
pub trait DirectMessenger: Send + Sync {
    async fn send_direct_message(
        &self,
        credentials: &DmCredentials,
        recipient_id: &str,
        text: &str,
    ) -> Result<(), SendError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest<'a> {
    recipient_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    errors: Vec<ProviderErrorEntry>,
}

/// Parse a provider failure body into its structured error entries.
///
/// Returns `None` when the body is not provider-shaped (not JSON, or no
/// `errors` list); those failures stay transport-level.
pub fn parse_provider_errors(body: &str) -> Option<Vec<ProviderErrorEntry>> {
    serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .map(|parsed| parsed.errors)
        .filter(|errors| !errors.is_empty())
}

/// HTTP client for the provider's direct-message endpoint.
pub struct HttpDirectMessenger {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDirectMessenger {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DirectMessenger for HttpDirectMessenger {
    async fn send_direct_message(
        &self,
        credentials: &DmCredentials,
        recipient_id: &str,
        text: &str,
    ) -> Result<(), SendError> {
        let url = format!("{}/direct_messages/new", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&credentials.access_token)
            .json(&SendMessageRequest { recipient_id, text })
            .send()
            .await
            .map_err(|err| SendError::Transport(err.into()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(|err| SendError::Transport(err.into()))?;

        match parse_provider_errors(&body) {
            Some(errors) => {
                tracing::debug!(status = %status, entries = errors.len(), "Provider rejected send");
                Err(SendError::Provider { errors })
            }
            None => Err(SendError::Transport(anyhow::anyhow!(
                "provider returned {} with unstructured body: {}",
                status,
                body
            ))),
        }
    }
}
