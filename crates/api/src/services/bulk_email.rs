//! Bulk mail dispatch.
//!
//! Sends one message to many recipients with bounded concurrency instead
//! of one task per recipient. Each recipient gets a bounded number of
//! attempts with exponential backoff and jitter; recipients that exhaust
//! their attempts land on the dead-letter list in the report, so a partial
//! outage degrades to a visible partial send instead of a silent loss.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::config::BulkEmailConfig;
use crate::services::mail::MailClient;

/// A recipient that exhausted its delivery attempts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeadLetter {
    pub to: String,
    pub error: String,
    pub attempts: u32,
}

/// Outcome of a bulk send.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkEmailReport {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub dead_letters: Vec<DeadLetter>,
}

/// Sends `subject`/`message` to every recipient.
///
/// At most `config.max_concurrency` sends are in flight at once. The
/// report is only returned once every recipient has either been delivered
/// or dead-lettered.
pub async fn send_bulk(
    mail: MailClient,
    config: &BulkEmailConfig,
    recipients: Vec<String>,
    subject: String,
    message: String,
) -> BulkEmailReport {
    let total = recipients.len();
    let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
    let subject = Arc::new(subject);
    let message = Arc::new(message);
    let max_attempts = config.max_attempts.max(1);
    let base_backoff_ms = config.base_backoff_ms;

    let mut tasks = JoinSet::new();
    for to in recipients {
        let mail = mail.clone();
        let semaphore = semaphore.clone();
        let subject = subject.clone();
        let message = message.clone();

        tasks.spawn(async move {
            // Closed only if the semaphore is dropped, which cannot happen
            // while tasks hold clones of it
            let _permit = semaphore.acquire().await.ok();
            send_with_retries(&mail, &to, &subject, &message, max_attempts, base_backoff_ms).await
        });
    }

    let mut sent = 0;
    let mut dead_letters = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => sent += 1,
            Ok(Err(dead)) => dead_letters.push(dead),
            Err(e) => warn!(error = %e, "Bulk send task panicked"),
        }
    }

    let failed = dead_letters.len();
    info!(total, sent, failed, "Bulk send completed");

    BulkEmailReport {
        total,
        sent,
        failed,
        dead_letters,
    }
}

async fn send_with_retries(
    mail: &MailClient,
    to: &str,
    subject: &str,
    message: &str,
    max_attempts: u32,
    base_backoff_ms: u64,
) -> Result<(), DeadLetter> {
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        match mail.send(to, subject, message).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                last_error = e.to_string();
                warn!(to = %to, attempt, error = %last_error, "Bulk send attempt failed");
                if attempt < max_attempts {
                    sleep(backoff(base_backoff_ms, attempt)).await;
                }
            }
        }
    }

    Err(DeadLetter {
        to: to.to_string(),
        error: last_error,
        attempts: max_attempts,
    })
}

/// Exponential backoff with jitter: base * 2^(attempt-1) plus up to 25%.
fn backoff(base_ms: u64, attempt: u32) -> Duration {
    let exp = base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    let jitter = rand::thread_rng().gen_range(0..=exp / 4 + 1);
    Duration::from_millis(exp + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailConfig;

    fn console_mail() -> MailClient {
        MailClient::new(MailConfig {
            enabled: true,
            provider: "console".to_string(),
            ..MailConfig::default()
        })
    }

    fn test_config() -> BulkEmailConfig {
        BulkEmailConfig {
            max_concurrency: 2,
            max_attempts: 2,
            base_backoff_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_bulk_send_delivers_to_every_recipient() {
        use fake::{faker::internet::en::SafeEmail, Fake};
        let recipients: Vec<String> = (0..10).map(|_| SafeEmail().fake()).collect();
        let report = send_bulk(
            console_mail(),
            &test_config(),
            recipients,
            "Subject".to_string(),
            "Body".to_string(),
        )
        .await;

        assert_eq!(report.total, 10);
        assert_eq!(report.sent, 10);
        assert_eq!(report.failed, 0);
        assert!(report.dead_letters.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_send_dead_letters_undeliverable_recipients() {
        // An unknown provider fails every attempt
        let broken = MailClient::new(MailConfig {
            enabled: true,
            provider: "broken".to_string(),
            ..MailConfig::default()
        });

        let report = send_bulk(
            broken,
            &test_config(),
            vec!["a@b.c".to_string(), "d@e.f".to_string()],
            "Subject".to_string(),
            "Body".to_string(),
        )
        .await;

        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 2);
        assert_eq!(report.dead_letters.len(), 2);
        assert!(report.dead_letters.iter().all(|d| d.attempts == 2));
    }

    #[tokio::test]
    async fn test_bulk_send_empty_recipient_list() {
        let report = send_bulk(
            console_mail(),
            &test_config(),
            vec![],
            "Subject".to_string(),
            "Body".to_string(),
        )
        .await;
        assert_eq!(report.total, 0);
        assert_eq!(report.sent, 0);
    }

    #[test]
    fn test_backoff_grows_with_attempts() {
        let first = backoff(100, 1);
        let third = backoff(100, 3);
        assert!(first >= Duration::from_millis(100));
        assert!(third >= Duration::from_millis(400));
    }
}
