//! Delivery of validated contact submissions.
//!
//! The site does not store submissions. They are POSTed to a webhook when one
//! is configured, or written to the log otherwise.

use crate::config::Config;
use crate::contact::ContactFormSubmission;
use crate::retry::{deliver_with_retry, RetryConfig};
use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// A single failed delivery attempt.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl DeliveryError {
    /// Network errors, 5xx and 429 are worth another attempt; other 4xx are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Network(_) => true,
            DeliveryError::Status { status, .. } => *status >= 500 || *status == 429,
        }
    }
}

/// Where accepted submissions go.
#[derive(Debug, Clone)]
pub enum ContactTransport {
    Webhook {
        client: reqwest::Client,
        url: String,
        token: Option<String>,
        retry: RetryConfig,
    },
    Log,
}

impl ContactTransport {
    /// Webhook transport if `CONTACT_WEBHOOK_URL` is set, log transport otherwise.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.contact_webhook_url {
            Some(url) => Self::webhook(url, config.contact_webhook_token.clone()),
            None => Ok(ContactTransport::Log),
        }
    }

    pub fn webhook(url: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build webhook HTTP client")?;

        Ok(ContactTransport::Webhook {
            client,
            url: url.to_string(),
            token,
            retry: RetryConfig::webhook(),
        })
    }

    /// Override the retry policy of a webhook transport.
    pub fn with_retry(self, config: RetryConfig) -> Self {
        match self {
            ContactTransport::Webhook {
                client, url, token, ..
            } => ContactTransport::Webhook {
                client,
                url,
                token,
                retry: config,
            },
            ContactTransport::Log => ContactTransport::Log,
        }
    }

    /// Hand a submission to the configured destination.
    pub async fn deliver(&self, submission: &ContactFormSubmission) -> Result<()> {
        match self {
            ContactTransport::Log => {
                info!(
                    language = %submission.language,
                    "Contact submission from {} <{}> ({} chars, no webhook configured)",
                    submission.name,
                    submission.email,
                    submission.message.chars().count()
                );
                Ok(())
            }
            ContactTransport::Webhook {
                client,
                url,
                token,
                retry,
            } => {
                deliver_with_retry(retry, url, || {
                    post_submission(client, url, token.as_deref(), submission)
                })
                .await
                .context("Failed to deliver contact submission")?;

                info!(
                    language = %submission.language,
                    "Contact submission from <{}> delivered to webhook",
                    submission.email
                );
                Ok(())
            }
        }
    }
}

async fn post_submission(
    client: &reqwest::Client,
    url: &str,
    token: Option<&str>,
    submission: &ContactFormSubmission,
) -> Result<(), DeliveryError> {
    let mut request = client.post(url).json(submission);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use chrono::Utc;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn submission() -> ContactFormSubmission {
        ContactFormSubmission {
            name: "Ali Reza".to_string(),
            email: "ali@example.com".to_string(),
            company: Some("Kara Steel".to_string()),
            phone: None,
            message: "Please contact me about wire specs.".to_string(),
            language: Locale::PERSIAN,
            consent: true,
            submitted_at: Utc::now(),
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::new(3, Duration::from_millis(10))
    }

    // ==================== DeliveryError Tests ====================

    #[test]
    fn test_status_retryability() {
        let status = |status| DeliveryError::Status {
            status,
            body: String::new(),
        };
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(400).is_retryable());
        assert!(!status(422).is_retryable());
    }

    // ==================== Log Transport Tests ====================

    #[tokio::test]
    async fn test_log_transport_always_succeeds() {
        assert!(ContactTransport::Log.deliver(&submission()).await.is_ok());
    }

    #[test]
    fn test_from_config_without_webhook_is_log() {
        let config = Config {
            port: 8080,
            messages_dir: None,
            contact_webhook_url: None,
            contact_webhook_token: None,
            admin_api_key: None,
        };
        assert!(matches!(
            ContactTransport::from_config(&config).unwrap(),
            ContactTransport::Log
        ));
    }

    // ==================== Webhook Transport Tests ====================

    #[tokio::test]
    async fn test_webhook_posts_json_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contact"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(body_partial_json(serde_json::json!({
                "name": "Ali Reza",
                "email": "ali@example.com",
                "language": "fa",
                "consent": true
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ContactTransport::webhook(
            &format!("{}/contact", server.uri()),
            Some("secret-token".to_string()),
        )
        .unwrap();

        transport.deliver(&submission()).await.unwrap();
    }

    #[tokio::test]
    async fn test_webhook_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contact"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/contact"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = ContactTransport::webhook(&format!("{}/contact", server.uri()), None)
            .unwrap()
            .with_retry(fast_retry());

        transport.deliver(&submission()).await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_webhook_does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contact"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad payload"))
            .mount(&server)
            .await;

        let transport = ContactTransport::webhook(&format!("{}/contact", server.uri()), None)
            .unwrap()
            .with_retry(fast_retry());

        let err = transport.deliver(&submission()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("HTTP 400: bad payload"));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_webhook_gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = ContactTransport::webhook(&server.uri(), None)
            .unwrap()
            .with_retry(fast_retry());

        assert!(transport.deliver(&submission()).await.is_err());
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_attempt_retry_still_posts_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ContactTransport::webhook(&server.uri(), None)
            .unwrap()
            .with_retry(RetryConfig::new(0, Duration::from_millis(10)));

        transport.deliver(&submission()).await.unwrap();
    }
}
