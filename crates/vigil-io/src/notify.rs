//! Notification adapters.
//!
//! [`WebhookNotifier`] POSTs one JSON envelope per new entry to a configured
//! endpoint; [`LogNotifier`] writes the payload to the structured log and is
//! the default when no webhook is configured (useful for staging and dry
//! deployments — delivery still shows up in the run's log output).

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use vigil_core::ports::Notifier;
use vigil_core::types::Notification;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// WebhookNotifier
// ---------------------------------------------------------------------------

/// Delivers notifications as HTTP POSTs. The envelope carries the queue
/// name and dedup flag alongside the payload so the receiving side can
/// route without parsing the message body.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building webhook client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        queue_name: &str,
        payload: &Notification,
        deduplicate: bool,
    ) -> anyhow::Result<()> {
        let envelope = json!({
            "queue": queue_name,
            "deduplicate": deduplicate,
            "message": payload,
        });
        let response = self
            .client
            .post(&self.endpoint)
            .json(&envelope)
            .send()
            .await
            .with_context(|| format!("posting notification to {}", self.endpoint))?;
        if !response.status().is_success() {
            anyhow::bail!("{} answered HTTP {}", self.endpoint, response.status());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LogNotifier
// ---------------------------------------------------------------------------

/// Writes each notification to the log instead of delivering it anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        queue_name: &str,
        payload: &Notification,
        _deduplicate: bool,
    ) -> anyhow::Result<()> {
        tracing::info!(
            queue = queue_name,
            feed = %payload.feed_name,
            address = %payload.address,
            first_seen = %payload.first_seen,
            last_seen = %payload.last_seen,
            "new feed entry"
        );
        Ok(())
    }
}
