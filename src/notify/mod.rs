// src/notify/mod.rs
pub mod onesignal;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

use crate::article::ArticleMetadata;
use crate::config::credentials::{PushCredentialsConfig, ENV_API_KEY, ENV_APP_ID};

pub use onesignal::OneSignalDispatcher;

/// The broadcast target. Only "everyone" is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Audience {
    #[default]
    AllSubscribers,
}

/// What to announce: the post's title and summary plus the live URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl Announcement {
    pub fn new(meta: ArticleMetadata, url: String) -> Self {
        Self {
            title: meta.title,
            description: meta.description,
            url,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("missing push credential: {0} is not set")]
pub struct MissingCredential(pub &'static str);

/// Credentials that are known to be present.
#[derive(Clone, PartialEq, Eq)]
pub struct PushCredentials {
    pub app_id: String,
    pub api_key: String,
}

impl PushCredentials {
    pub fn require(cfg: &PushCredentialsConfig) -> Result<Self, MissingCredential> {
        let app_id = cfg.app_id.clone().ok_or(MissingCredential(ENV_APP_ID))?;
        let api_key = cfg.api_key.clone().ok_or(MissingCredential(ENV_API_KEY))?;
        Ok(Self { app_id, api_key })
    }
}

impl fmt::Debug for PushCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushCredentials")
            .field("app_id", &self.app_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// One fully-specified broadcast, built right before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub credentials: PushCredentials,
    pub title: String,
    pub description: String,
    pub url: String,
    pub audience: Audience,
}

impl NotificationRequest {
    pub fn new(credentials: PushCredentials, ann: &Announcement) -> Self {
        Self {
            credentials,
            title: ann.title.clone(),
            description: ann.description.clone(),
            url: ann.url.clone(),
            audience: Audience::AllSubscribers,
        }
    }
}

/// Raw transport result of a dispatch; the body is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub status: StatusCode,
    pub body: String,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Sends a notification request. `Err` is reserved for transport failures;
/// any HTTP answer, including 4xx/5xx, comes back as a report.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, req: &NotificationRequest) -> Result<DispatchReport>;

    /// Serialized body for `req`, used for dry runs.
    fn preview(&self, req: &NotificationRequest) -> Result<String>;
}
