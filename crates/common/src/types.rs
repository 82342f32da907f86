use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job type tag for the one-time welcome direct message.
pub const JOB_TYPE_WELCOME_MESSAGE: &str = "sendWelcomeMessage";

/// Reachability status of a user account.
///
/// The delivery engine only ever moves users away from `Active`
/// (`suspended` / `revoked`); nothing in Herald sets a user back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserCategory {
    Active,
    Suspended,
    Revoked,
}

impl std::fmt::Display for UserCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserCategory::Active => write!(f, "active"),
            UserCategory::Suspended => write!(f, "suspended"),
            UserCategory::Revoked => write!(f, "revoked"),
        }
    }
}

/// Payload of a welcome-message job.
///
/// Wire shape is camelCase: `{ "userId", "username" }` on the first attempt,
/// plus `"title"` on re-enqueued payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeTask {
    /// Human-readable description of why the job was re-enqueued.
    /// Absent on the first attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub user_id: String,
    pub username: String,
}

impl WelcomeTask {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            title: None,
            user_id: user_id.into(),
            username: username.into(),
        }
    }

    /// Payload for a delayed re-send of the same message, with the title
    /// annotated by the provider error code that triggered the retry.
    pub fn retry(&self, code: u32) -> Self {
        Self {
            title: Some(format!(
                "Resend welcome message to @{} following an error {}",
                self.username, code
            )),
            user_id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }
}

/// A registered user, keyed by their messaging-provider account id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub category: UserCategory,
    pub locale: String,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Send-capable credentials resolved for a user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DmCredentials {
    pub access_token: String,
}

/// One entry of a structured messaging-provider error response.
///
/// A single failed send may carry zero, one, or many entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorEntry {
    pub code: u32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_task_wire_shape_camel_case() {
        let task = WelcomeTask::new("12345", "alice");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json, serde_json::json!({"userId": "12345", "username": "alice"}));
    }

    #[test]
    fn test_welcome_task_deserializes_without_title() {
        let task: WelcomeTask =
            serde_json::from_str(r#"{"userId": "12345", "username": "alice"}"#).unwrap();
        assert_eq!(task.user_id, "12345");
        assert_eq!(task.username, "alice");
        assert!(task.title.is_none());
    }

    #[test]
    fn test_retry_payload_keeps_identity_and_annotates_title() {
        let task = WelcomeTask::new("12345", "alice");
        let retry = task.retry(130);

        assert_eq!(retry.user_id, "12345");
        assert_eq!(retry.username, "alice");
        assert_eq!(
            retry.title.as_deref(),
            Some("Resend welcome message to @alice following an error 130")
        );
    }

    #[test]
    fn test_retry_payload_serializes_title() {
        let retry = WelcomeTask::new("12345", "alice").retry(88);
        let json = serde_json::to_value(&retry).unwrap();
        assert_eq!(json["title"], "Resend welcome message to @alice following an error 88");
        assert_eq!(json["userId"], "12345");
    }
}
