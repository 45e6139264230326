// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod article;
pub mod config;
pub mod notify;
pub mod permalink;
pub mod pipeline;
pub mod poll;

// ---- Re-exports for stable public API ----
pub use crate::article::{ArticleMetadata, ArticleSource};
pub use crate::config::{load_settings, PushCredentialsConfig, Settings};
pub use crate::notify::{Announcement, DispatchReport, Dispatcher, MissingCredential, OneSignalDispatcher};
pub use crate::permalink::{resolve_public_url, PermalinkTemplate};
pub use crate::pipeline::{Pipeline, PipelineOutcome};
pub use crate::poll::{AvailabilityPoller, Clock, HttpProber, PollOutcome, PollSettings, Prober, TokioClock};
