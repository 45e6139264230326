// src/poll/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::Prober;

pub(crate) const USER_AGENT: &str = concat!("post-publish-notifier/", env!("CARGO_PKG_VERSION"));

/// `HEAD` prober. Redirects are followed, so a post that lives behind a 301
/// still counts once the final hop answers 200.
#[derive(Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("building probe http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Result<StatusCode> {
        let rsp = self
            .client
            .head(url)
            .send()
            .await
            .with_context(|| format!("HEAD {url}"))?;
        Ok(rsp.status())
    }
}
