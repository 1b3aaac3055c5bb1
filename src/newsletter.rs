use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, instrument, warn};

use crate::config::BeehiivConfig;
use crate::state::AppState;

#[async_trait]
pub trait Newsletter: Send + Sync {
    /// Whether the email already has a subscription.
    async fn is_subscribed(&self, email: &str) -> anyhow::Result<bool>;
    async fn subscribe(&self, email: &str) -> anyhow::Result<()>;
}

/// Beehiiv publication client.
pub struct BeehiivNewsletter {
    client: Client,
    base_url: String,
    api_key: String,
    publication_id: String,
}

impl BeehiivNewsletter {
    pub fn new(config: &BeehiivConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            publication_id: config.publication_id.clone(),
        }
    }
}

#[async_trait]
impl Newsletter for BeehiivNewsletter {
    async fn is_subscribed(&self, email: &str) -> anyhow::Result<bool> {
        let url = format!(
            "{}/publications/{}/subscriptions/by_email/{}",
            self.base_url, self.publication_id, email
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        // 404 is the documented "not subscribed" answer, not a failure.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("beehiiv returned {}: {}", status, body);
        }
        Ok(true)
    }

    async fn subscribe(&self, email: &str) -> anyhow::Result<()> {
        let url = format!(
            "{}/publications/{}/subscriptions",
            self.base_url, self.publication_id
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "email": email,
                "reactivate_existing": false,
                "send_welcome_email": false,
                "utm_source": "calofree",
                "utm_medium": "ads",
                "utm_campaign": "busybits",
                "referring_site": "www.freecaloriecounter.com/",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("beehiiv returned {}: {}", status, body);
        }
        Ok(())
    }
}

/// Used when Beehiiv is not configured; enrollment is silently skipped.
pub struct NoopNewsletter;

#[async_trait]
impl Newsletter for NoopNewsletter {
    async fn is_subscribed(&self, _email: &str) -> anyhow::Result<bool> {
        Ok(true)
    }

    async fn subscribe(&self, _email: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Best-effort enrollment used by the OTP issuer: check, subscribe on
/// miss, and swallow every failure so it can never block a login.
pub async fn enroll_best_effort(newsletter: &dyn Newsletter, email: &str) {
    match newsletter.is_subscribed(email).await {
        Ok(true) => {}
        Ok(false) => {
            if let Err(e) = newsletter.subscribe(email).await {
                warn!(error = %e, %email, "newsletter subscribe failed; continuing login");
            }
        }
        Err(e) => {
            warn!(error = %e, %email, "newsletter lookup failed; continuing login");
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/newsletter/subscribe", post(subscribe))
}

/// Landing-page subscription. Unlike the best-effort path inside login,
/// here the subscription *is* the request, so failures surface.
#[instrument(skip(state, payload))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(mut payload): Json<SubscribeRequest>,
) -> Result<Json<serde_json::Value>, (axum::http::StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !crate::auth::is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((axum::http::StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    if state.config.beehiiv.is_none() {
        return Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "Newsletter is not configured".into(),
        ));
    }

    state.newsletter.subscribe(&payload.email).await.map_err(|e| {
        error!(error = %e, email = %payload.email, "newsletter subscribe failed");
        (
            axum::http::StatusCode::BAD_GATEWAY,
            "Failed to subscribe. Please try again.".into(),
        )
    })?;

    Ok(Json(json!({ "message": "Subscribed" })))
}
