// src/notify/onesignal.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use super::{Audience, DispatchReport, Dispatcher, NotificationRequest};
use crate::config::PushSettings;
use crate::poll::http::USER_AGENT;

const LOCALE: &str = "en";
const ALL_SUBSCRIBERS_SEGMENT: &str = "Total Subscriptions";

/// OneSignal REST client for "create notification". Single attempt, no retry.
#[derive(Clone)]
pub struct OneSignalDispatcher {
    endpoint: String,
    client: Client,
}

impl OneSignalDispatcher {
    pub fn new(settings: &PushSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .context("building push http client")?;
        Ok(Self {
            endpoint: settings.endpoint.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct OneSignalPayload<'a> {
    app_id: &'a str,
    headings: BTreeMap<&'static str, &'a str>,
    contents: BTreeMap<&'static str, &'a str>,
    url: &'a str,
    included_segments: Vec<&'static str>,
}

impl<'a> OneSignalPayload<'a> {
    fn from_request(req: &'a NotificationRequest) -> Self {
        let included_segments = match req.audience {
            Audience::AllSubscribers => vec![ALL_SUBSCRIBERS_SEGMENT],
        };
        Self {
            app_id: &req.credentials.app_id,
            headings: BTreeMap::from([(LOCALE, req.title.as_str())]),
            contents: BTreeMap::from([(LOCALE, req.description.as_str())]),
            url: &req.url,
            included_segments,
        }
    }
}

#[async_trait]
impl Dispatcher for OneSignalDispatcher {
    async fn dispatch(&self, req: &NotificationRequest) -> Result<DispatchReport> {
        let payload = OneSignalPayload::from_request(req);
        let body = serde_json::to_vec(&payload).context("encoding push payload")?;

        let rsp = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .header(
                header::AUTHORIZATION,
                format!("Basic {}", req.credentials.api_key),
            )
            .body(body)
            .send()
            .await
            .context("push service request")?;

        let status = rsp.status();
        let body = match rsp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    target: "notify",
                    status = status.as_u16(),
                    "could not read push service response body: {e:#}"
                );
                String::new()
            }
        };
        Ok(DispatchReport { status, body })
    }

    fn preview(&self, req: &NotificationRequest) -> Result<String> {
        serde_json::to_string_pretty(&OneSignalPayload::from_request(req))
            .context("encoding push payload")
    }
}
