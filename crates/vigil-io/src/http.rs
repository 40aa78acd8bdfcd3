//! HTTP feed fetcher.
//!
//! Thin reqwest wrapper behind [`FeedFetcher`]: one shared client with a
//! request timeout and a stable user agent. A 404 maps to `Ok(None)`; any
//! other non-success status is an error for the caller to contain at feed
//! granularity.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;

use vigil_core::ports::FeedFetcher;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("{url} answered HTTP {}", response.status());
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("reading body from {url}"))?;
        Ok(Some(body))
    }
}
