//! Outbound mail client.
//!
//! Mail goes out through a single HTTP dispatch endpoint that accepts a
//! JSON payload and relays it to the actual mail provider. Supported
//! providers:
//! - `console`: logs mail instead of sending (development)
//! - `http`: POSTs to the configured dispatch endpoint

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::MailConfig;

/// Errors that can occur during mail operations.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail service not configured")]
    NotConfigured,

    #[error("Failed to send mail: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Payload for the HTTP dispatch endpoint. The endpoint expects
/// camelCase keys.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DispatchPayload<'a> {
    to: &'a str,
    subject: &'a str,
    message: &'a str,
    from_email: &'a str,
    from_name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    reply_to: &'a str,
}

/// Response from the dispatch endpoint.
#[derive(Debug, Deserialize)]
struct DispatchResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    /// Present when the endpoint delivered with a degraded configuration,
    /// e.g. a fallback sender address.
    #[serde(default)]
    warning: Option<String>,
}

/// Client for sending transactional mail.
#[derive(Clone)]
pub struct MailClient {
    config: Arc<MailConfig>,
    http: reqwest::Client,
}

impl MailClient {
    /// Creates a new mail client from configuration.
    pub fn new(config: MailConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            config: Arc::new(config),
            http,
        }
    }

    /// Whether mail sending is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Sends one mail. When the service is disabled the send is skipped
    /// and reported as success, so callers do not need to special-case
    /// environments without mail.
    pub async fn send(&self, to: &str, subject: &str, message: &str) -> Result<(), MailError> {
        if !self.config.enabled {
            debug!(to = %to, subject = %subject, "Mail disabled, skipping send");
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => {
                info!(
                    to = %to,
                    subject = %subject,
                    body_len = message.len(),
                    "Console mail provider: logging instead of sending"
                );
                Ok(())
            }
            "http" => self.send_http(to, subject, message).await,
            provider => {
                error!(provider = %provider, "Unknown mail provider");
                Err(MailError::NotConfigured)
            }
        }
    }

    async fn send_http(&self, to: &str, subject: &str, message: &str) -> Result<(), MailError> {
        if self.config.endpoint.is_empty() {
            return Err(MailError::NotConfigured);
        }

        let payload = DispatchPayload {
            to,
            subject,
            message,
            from_email: &self.config.sender_email,
            from_name: &self.config.sender_name,
            reply_to: &self.config.reply_to,
        };

        let mut request = self.http.post(&self.config.endpoint).json(&payload);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::ProviderError(format!(
                "dispatch endpoint returned {}: {}",
                status, body
            )));
        }

        let parsed: DispatchResponse = response
            .json()
            .await
            .map_err(|e| MailError::ProviderError(e.to_string()))?;

        if let Some(warning) = &parsed.warning {
            warn!(to = %to, warning = %warning, "Mail delivered with a warning");
        }

        if parsed.success {
            debug!(to = %to, "Mail dispatched");
            Ok(())
        } else {
            Err(MailError::SendFailed(
                parsed.message.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// Builds the registration confirmation mail for a participant.
pub fn confirmation_mail(form_title: &str, participant_name: &str) -> (String, String) {
    let subject = format!("Registration confirmed: {}", form_title);
    let message = format!(
        "Hi {},\n\n\
         Your registration for {} has been received and confirmed.\n\n\
         Please keep this email for your records. If you did not register \
         for this event, you can ignore this message.\n",
        participant_name, form_title
    );
    (subject, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console_config() -> MailConfig {
        MailConfig {
            enabled: true,
            provider: "console".to_string(),
            ..MailConfig::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_client_skips_send() {
        let client = MailClient::new(MailConfig::default());
        assert!(!client.is_enabled());
        let result = client.send("a@b.c", "subject", "body").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_console_provider_succeeds() {
        let client = MailClient::new(console_config());
        assert!(client.send("a@b.c", "subject", "body").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let client = MailClient::new(MailConfig {
            enabled: true,
            provider: "carrier-pigeon".to_string(),
            ..MailConfig::default()
        });
        assert!(matches!(
            client.send("a@b.c", "s", "b").await,
            Err(MailError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_http_provider_requires_endpoint() {
        let client = MailClient::new(MailConfig {
            enabled: true,
            provider: "http".to_string(),
            ..MailConfig::default()
        });
        assert!(matches!(
            client.send("a@b.c", "s", "b").await,
            Err(MailError::NotConfigured)
        ));
    }

    #[test]
    fn test_confirmation_mail_names_event_and_participant() {
        let (subject, message) = confirmation_mail("Hackathon 2025", "Asha Patil");
        assert!(subject.contains("Hackathon 2025"));
        assert!(message.contains("Asha Patil"));
        assert!(message.contains("Hackathon 2025"));
    }

    #[test]
    fn test_dispatch_payload_uses_camel_case() {
        let payload = DispatchPayload {
            to: "a@b.c",
            subject: "s",
            message: "m",
            from_email: "noreply@events.college.edu",
            from_name: "Event Registrations",
            reply_to: "",
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"fromEmail\""));
        assert!(json.contains("\"fromName\""));
        // Empty reply-to is omitted entirely
        assert!(!json.contains("replyTo"));
    }
}
