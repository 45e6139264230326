// src/poll/mod.rs
//! Deployment availability check: probe the public URL until it answers
//! 200 OK or the time budget runs out.

pub mod http;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub use http::HttpProber;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause between two probes.
    pub interval: Duration,
    /// Ceiling on total time spent waiting.
    pub timeout: Duration,
    /// Per-request transport timeout.
    pub probe_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }
}

impl PollSettings {
    /// Zero interval or probe timeout falls back to the default.
    pub fn sanitized(self) -> Self {
        let def = Self::default();
        Self {
            interval: if self.interval.is_zero() { def.interval } else { self.interval },
            timeout: self.timeout,
            probe_timeout: if self.probe_timeout.is_zero() {
                def.probe_timeout
            } else {
                self.probe_timeout
            },
        }
    }
}

/// Lightweight existence check against a URL. `Err` means the request never
/// produced a status (DNS, refused connection, transport timeout).
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> Result<StatusCode>;
}

/// Time source for the poll loop; swapped for a manual clock in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, dur: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Live { elapsed: Duration, attempts: u32 },
    TimedOut { elapsed: Duration, attempts: u32 },
}

impl PollOutcome {
    pub fn is_live(&self) -> bool {
        matches!(self, PollOutcome::Live { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            PollOutcome::Live { elapsed, .. } | PollOutcome::TimedOut { elapsed, .. } => *elapsed,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Live { attempts, .. } | PollOutcome::TimedOut { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Bounded probe loop. One probe in flight at a time.
pub struct AvailabilityPoller<'a> {
    prober: &'a dyn Prober,
    clock: &'a dyn Clock,
    interval: Duration,
    timeout: Duration,
}

impl<'a> AvailabilityPoller<'a> {
    pub fn new(prober: &'a dyn Prober, clock: &'a dyn Clock, settings: &PollSettings) -> Self {
        Self {
            prober,
            clock,
            interval: settings.interval,
            timeout: settings.timeout,
        }
    }

    pub async fn wait_until_live(&self, url: &str) -> PollOutcome {
        let start = self.clock.now();
        let mut attempts: u32 = 0;

        info!(
            target: "poll",
            url,
            interval_secs = self.interval.as_secs(),
            timeout_secs = self.timeout.as_secs(),
            "waiting for deployment"
        );

        loop {
            // Nothing starts at or after the deadline, and no probe may outlive it.
            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= self.timeout {
                return PollOutcome::TimedOut { elapsed, attempts };
            }
            let remaining = self.timeout - elapsed;

            attempts += 1;
            match tokio::time::timeout(remaining, self.prober.probe(url)).await {
                Ok(Ok(StatusCode::OK)) => {
                    let elapsed = self.clock.now().saturating_duration_since(start);
                    info!(target: "poll", url, attempts, elapsed_secs = elapsed.as_secs(), "post is live");
                    return PollOutcome::Live { elapsed, attempts };
                }
                Ok(Ok(status)) => {
                    info!(target: "poll", attempt = attempts, status = status.as_u16(), "not live yet");
                }
                Ok(Err(e)) => {
                    warn!(target: "poll", attempt = attempts, "probe failed: {e:#}");
                }
                Err(_) => {
                    warn!(target: "poll", attempt = attempts, "probe cut off at the poll deadline");
                }
            }

            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= self.timeout {
                return PollOutcome::TimedOut { elapsed, attempts };
            }
            self.clock.sleep(self.interval.min(self.timeout - elapsed)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct ManualClock {
        now: Mutex<Instant>,
    }

    #[async_trait]
    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
        async fn sleep(&self, dur: Duration) {
            *self.now.lock().unwrap() += dur;
        }
    }

    struct Scripted {
        calls: AtomicU32,
        live_from: u32,
    }

    #[async_trait]
    impl Prober for Scripted {
        async fn probe(&self, _url: &str) -> Result<StatusCode> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 1 {
                anyhow::bail!("connection refused");
            }
            if n >= self.live_from {
                Ok(StatusCode::OK)
            } else {
                Ok(StatusCode::NOT_FOUND)
            }
        }
    }

    fn settings(interval: u64, timeout: u64) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(interval),
            timeout: Duration::from_secs(timeout),
            probe_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn transport_errors_do_not_stop_the_loop() {
        let clock = ManualClock {
            now: Mutex::new(Instant::now()),
        };
        let prober = Scripted {
            calls: AtomicU32::new(0),
            live_from: 3,
        };
        let out = AvailabilityPoller::new(&prober, &clock, &settings(30, 300))
            .wait_until_live("https://example.test/")
            .await;
        assert_eq!(
            out,
            PollOutcome::Live {
                elapsed: Duration::from_secs(60),
                attempts: 3
            }
        );
    }

    struct Hung;

    #[async_trait]
    impl Prober for Hung {
        async fn probe(&self, _url: &str) -> Result<StatusCode> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn hung_probe_cannot_outlast_the_budget() {
        let s = PollSettings {
            interval: Duration::from_millis(10),
            timeout: Duration::from_millis(100),
            probe_timeout: Duration::from_secs(10),
        };
        let t0 = Instant::now();
        let out = AvailabilityPoller::new(&Hung, &TokioClock, &s)
            .wait_until_live("https://example.test/")
            .await;
        assert!(matches!(out, PollOutcome::TimedOut { attempts: 1, .. }), "{out:?}");
        assert!(t0.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn zero_interval_is_sanitized() {
        let s = settings(0, 0).sanitized();
        assert_eq!(s.interval, PollSettings::default().interval);
        assert_eq!(s.timeout, Duration::ZERO);
    }

    #[tokio::test]
    async fn last_sleep_is_clamped_to_budget() {
        let clock = ManualClock {
            now: Mutex::new(Instant::now()),
        };
        let prober = Scripted {
            calls: AtomicU32::new(0),
            live_from: u32::MAX,
        };
        let out = AvailabilityPoller::new(&prober, &clock, &settings(30, 70))
            .wait_until_live("https://example.test/")
            .await;
        // probes at 0s, 30s, 60s; the deadline at 70s starts no new one
        assert_eq!(
            out,
            PollOutcome::TimedOut {
                elapsed: Duration::from_secs(70),
                attempts: 3
            }
        );
    }
}
