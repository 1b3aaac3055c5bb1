use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::config::MailgunConfig;

/// How an OTP code actually reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed off to the transactional email API.
    Sent,
    /// No mail transport configured; the code went to the server log.
    Logged,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<Delivery>;
}

/// Mailgun transactional mail. Messages are form-encoded and authenticated
/// with HTTP Basic auth (`api:{key}`).
pub struct MailgunMailer {
    client: Client,
    base_url: String,
    domain: String,
    api_key: String,
}

impl MailgunMailer {
    pub fn new(config: &MailgunConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            domain: config.domain.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<Delivery> {
        let url = format!("{}/{}/messages", self.base_url, self.domain);
        let params = [
            ("from", format!("Calorie Joy <mailgun@{}>", self.domain)),
            ("to", to.to_string()),
            ("subject", "Your Login OTP Code".to_string()),
            (
                "text",
                format!(
                    "Your one-time password (OTP) is: {}. This code is valid for the next 5 minutes.",
                    code
                ),
            ),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.api_key))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("mailgun returned {}: {}", status, body);
        }
        Ok(Delivery::Sent)
    }
}

/// Fallback when Mailgun is not configured: the code only exists in the
/// server log, so login still works in local/dev environments.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<Delivery> {
        info!(%to, %code, "mail transport not configured; OTP logged instead of sent");
        Ok(Delivery::Logged)
    }
}
