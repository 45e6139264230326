// src/config/mod.rs
//! Run settings: built-in defaults, then an optional TOML file, then env
//! overrides. Push-service credentials live in [`credentials`] and are only
//! checked when a notification is about to be sent.

pub mod credentials;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::permalink::PermalinkTemplate;
use crate::poll::PollSettings;

pub use credentials::PushCredentialsConfig;

pub const DEFAULT_SITE_URL: &str = "https://tharunaditya.github.io";
pub const DEFAULT_CONFIG_PATH: &str = "config/notify.toml";
pub const ONESIGNAL_ENDPOINT: &str = "https://onesignal.com/api/v1/notifications";
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 30;

pub const ENV_CONFIG_PATH: &str = "NOTIFY_CONFIG_PATH";
pub const ENV_SITE_URL: &str = "NOTIFY_SITE_URL";
pub const ENV_PERMALINK: &str = "NOTIFY_PERMALINK";
pub const ENV_POLL_INTERVAL_SECS: &str = "NOTIFY_POLL_INTERVAL_SECS";
pub const ENV_POLL_TIMEOUT_SECS: &str = "NOTIFY_POLL_TIMEOUT_SECS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "NOTIFY_PROBE_TIMEOUT_SECS";
pub const ENV_PUSH_ENDPOINT: &str = "NOTIFY_PUSH_ENDPOINT";

/// Where and how long to talk to the push service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSettings {
    pub endpoint: String,
    pub timeout: Duration,
}

impl PushSettings {
    /// Zero timeout falls back to the default.
    pub fn sanitized(self) -> Self {
        Self {
            timeout: if self.timeout.is_zero() {
                Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS)
            } else {
                self.timeout
            },
            ..self
        }
    }
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            endpoint: ONESIGNAL_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub site_url: String,
    pub permalink: PermalinkTemplate,
    pub poll: PollSettings,
    pub push: PushSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            permalink: PermalinkTemplate::default(),
            poll: PollSettings::default(),
            push: PushSettings::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    site: SiteSection,
    poll: PollSection,
    push: PushSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SiteSection {
    url: Option<String>,
    permalink: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PollSection {
    interval_secs: Option<u64>,
    timeout_secs: Option<u64>,
    probe_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PushSection {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

impl Settings {
    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(s).context("parsing notifier config")?;
        let mut out = Self::default();

        if let Some(url) = file.site.url {
            out.site_url = url;
        }
        if let Some(p) = file.site.permalink {
            out.permalink = p
                .parse()
                .with_context(|| format!("invalid [site].permalink {p:?}"))?;
        }
        if let Some(v) = file.poll.interval_secs {
            out.poll.interval = Duration::from_secs(v);
        }
        if let Some(v) = file.poll.timeout_secs {
            out.poll.timeout = Duration::from_secs(v);
        }
        if let Some(v) = file.poll.probe_timeout_secs {
            out.poll.probe_timeout = Duration::from_secs(v);
        }
        if let Some(e) = file.push.endpoint {
            out.push.endpoint = e;
        }
        if let Some(v) = file.push.timeout_secs {
            out.push.timeout = Duration::from_secs(v);
        }

        Ok(out)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading notifier config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Apply `NOTIFY_*` overrides. Unparsable numbers are ignored with a
    /// warning; an invalid permalink template is an error.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_SITE_URL) {
            self.site_url = url.trim().to_string();
        }
        if let Some(p) = non_empty(ENV_PERMALINK) {
            self.permalink = p
                .trim()
                .parse()
                .with_context(|| format!("invalid {ENV_PERMALINK} {p:?}"))?;
        }
        if let Some(v) = parse_secs(ENV_POLL_INTERVAL_SECS, non_empty(ENV_POLL_INTERVAL_SECS)) {
            self.poll.interval = v;
        }
        if let Some(v) = parse_secs(ENV_POLL_TIMEOUT_SECS, non_empty(ENV_POLL_TIMEOUT_SECS)) {
            self.poll.timeout = v;
        }
        if let Some(v) = parse_secs(ENV_PROBE_TIMEOUT_SECS, non_empty(ENV_PROBE_TIMEOUT_SECS)) {
            self.poll.probe_timeout = v;
        }
        if let Some(e) = non_empty(ENV_PUSH_ENDPOINT) {
            self.push.endpoint = e.trim().to_string();
        }
        Ok(())
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|k| std::env::var(k).ok())
    }
}

fn parse_secs(key: &str, raw: Option<String>) -> Option<Duration> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(Duration::from_secs(v)),
        Err(_) => {
            warn!(target: "config", key, value = %raw, "ignoring non-numeric override");
            None
        }
    }
}

/// Resolve which config file to read:
/// 1) explicit path (must exist)
/// 2) $NOTIFY_CONFIG_PATH (must exist)
/// 3) config/notify.toml if present
fn config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(p) = explicit {
        if !p.exists() {
            return Err(anyhow!("config file {} does not exist", p.display()));
        }
        return Ok(Some(p.to_path_buf()));
    }
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        return Ok(Some(pb));
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
    Ok(fallback.exists().then_some(fallback))
}

/// Defaults, then config file (if any), then process env.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match config_file(explicit)? {
        Some(path) => {
            debug!(target: "config", path = %path.display(), "loading config file");
            Settings::from_path(&path)?
        }
        None => Settings::default(),
    };
    settings.apply_env()?;
    settings.poll = settings.poll.sanitized();
    settings.push = settings.push.sanitized();
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_keeps_defaults() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn file_sections_override_defaults() {
        let s = Settings::from_toml_str(
            r#"
[site]
url = "https://example.github.io"
permalink = "{site}/{year}/{slug}.html"

[poll]
interval_secs = 5
timeout_secs = 60

[push]
timeout_secs = 3
"#,
        )
        .unwrap();
        assert_eq!(s.site_url, "https://example.github.io");
        assert_eq!(s.permalink.to_string(), "{site}/{year}/{slug}.html");
        assert_eq!(s.poll.interval, Duration::from_secs(5));
        assert_eq!(s.poll.timeout, Duration::from_secs(60));
        assert_eq!(s.poll.probe_timeout, PollSettings::default().probe_timeout);
        assert_eq!(s.push.endpoint, ONESIGNAL_ENDPOINT);
        assert_eq!(s.push.timeout, Duration::from_secs(3));
    }

    #[test]
    fn zero_push_timeout_is_sanitized() {
        let s = Settings::from_toml_str("[push]\ntimeout_secs = 0\n").unwrap();
        assert_eq!(s.push.timeout, Duration::ZERO);
        assert_eq!(
            s.push.sanitized().timeout,
            Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS)
        );
    }

    #[test]
    fn example_config_spells_out_the_defaults() {
        let s = Settings::from_toml_str(include_str!("../../config/notify.example.toml")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml_str("[site]\nbase = \"x\"\n").is_err());
    }

    #[test]
    fn env_overrides_win_and_bad_numbers_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_SITE_URL, " https://override.example "),
            (ENV_POLL_INTERVAL_SECS, "ten"),
            (ENV_POLL_TIMEOUT_SECS, "120"),
        ]);
        let mut s = Settings::default();
        s.apply_env_with(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(s.site_url, "https://override.example");
        assert_eq!(s.poll.interval, PollSettings::default().interval);
        assert_eq!(s.poll.timeout, Duration::from_secs(120));
    }

    #[test]
    fn bad_permalink_override_is_an_error() {
        let mut s = Settings::default();
        let res = s.apply_env_with(|k| (k == ENV_PERMALINK).then(|| "{site}/{tag}".to_string()));
        assert!(res.is_err());
    }
}
