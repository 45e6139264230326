// src/pipeline.rs
//! Run order: extract metadata + resolve URL → wait for the URL to go live →
//! broadcast once. A timeout skips the broadcast without failing the run;
//! missing credentials are the only fatal condition after input validation.

use anyhow::Result;
use tracing::{error, info, warn};

use crate::article::ArticleSource;
use crate::config::{PushCredentialsConfig, Settings};
use crate::notify::{Announcement, DispatchReport, Dispatcher, NotificationRequest, PushCredentials};
use crate::permalink::resolve_public_url;
use crate::poll::{AvailabilityPoller, Clock, PollOutcome, Prober};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The push service answered; the report may still carry a non-2xx status.
    Dispatched(DispatchReport),
    /// The request never got an HTTP answer.
    DispatchFailed,
    /// Dry run: payload that would have been posted.
    DryRun { payload: String },
    /// The post never went live within the poll budget.
    SkippedNotLive(PollOutcome),
}

impl PipelineOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineOutcome::Dispatched(r) if r.is_success() => "sent",
            PipelineOutcome::Dispatched(_) => "rejected",
            PipelineOutcome::DispatchFailed => "send-failed",
            PipelineOutcome::DryRun { .. } => "dry-run",
            PipelineOutcome::SkippedNotLive(_) => "skipped-not-live",
        }
    }
}

/// Extract metadata and resolve the public URL for a post. Never fails.
pub fn announcement_for(source: &ArticleSource, settings: &Settings) -> Announcement {
    let meta = source.metadata();
    let url = resolve_public_url(&source.path, &settings.site_url, &settings.permalink);
    Announcement::new(meta, url)
}

pub struct Pipeline<'a> {
    settings: &'a Settings,
    credentials: &'a PushCredentialsConfig,
    prober: &'a dyn Prober,
    clock: &'a dyn Clock,
    dispatcher: &'a dyn Dispatcher,
    dry_run: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        settings: &'a Settings,
        credentials: &'a PushCredentialsConfig,
        prober: &'a dyn Prober,
        clock: &'a dyn Clock,
        dispatcher: &'a dyn Dispatcher,
    ) -> Self {
        Self {
            settings,
            credentials,
            prober,
            clock,
            dispatcher,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    pub async fn run(&self, source: &ArticleSource) -> Result<PipelineOutcome> {
        info!(target: "pipeline", path = %source.path.display(), "processing post");

        let ann = announcement_for(source, self.settings);
        info!(target: "pipeline", title = %ann.title, url = %ann.url, "resolved post");

        let poll = AvailabilityPoller::new(self.prober, self.clock, &self.settings.poll)
            .wait_until_live(&ann.url)
            .await;
        if !poll.is_live() {
            warn!(
                target: "pipeline",
                url = %ann.url,
                attempts = poll.attempts(),
                elapsed_secs = poll.elapsed().as_secs(),
                "post did not go live in time, skipping notification"
            );
            return Ok(PipelineOutcome::SkippedNotLive(poll));
        }

        let creds = PushCredentials::require(self.credentials)?;
        let req = NotificationRequest::new(creds, &ann);

        if self.dry_run {
            let payload = self.dispatcher.preview(&req)?;
            info!(target: "pipeline", %payload, "dry run, notification not sent");
            return Ok(PipelineOutcome::DryRun { payload });
        }

        info!(target: "notify", title = %req.title, url = %req.url, "sending notification");
        match self.dispatcher.dispatch(&req).await {
            Ok(report) => {
                if report.is_success() {
                    info!(target: "notify", status = report.status.as_u16(), body = %report.body, "push service response");
                } else {
                    warn!(target: "notify", status = report.status.as_u16(), body = %report.body, "push service rejected notification");
                }
                Ok(PipelineOutcome::Dispatched(report))
            }
            Err(e) => {
                error!(target: "notify", "notification request failed: {e:#}");
                Ok(PipelineOutcome::DispatchFailed)
            }
        }
    }
}
