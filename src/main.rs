//! `notify-post`: announce a freshly published post once it is live.
//!
//! Typically invoked by CI after the site deploy job, with the path of the
//! newly added post as the only argument.

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use post_publish_notifier::{
    load_settings, ArticleSource, HttpProber, OneSignalDispatcher, Pipeline, PipelineOutcome,
    PushCredentialsConfig, TokioClock,
};

const ENV_LOG_FORMAT: &str = "NOTIFY_LOG_FORMAT";

/// Library events use short targets (`poll`, `pipeline`, `notify`, `config`).
const DEFAULT_LOG_FILTER: &str =
    "poll=info,pipeline=info,notify=info,config=info,post_publish_notifier=info,notify_post=info,warn";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the post source file, e.g. _posts/2026-01-27-flush-reload.md
    article: PathBuf,

    /// TOML config file (defaults to $NOTIFY_CONFIG_PATH, then config/notify.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the site root URL for this run
    #[arg(long)]
    site_url: Option<String>,

    /// Wait for the post and build the payload, but do not send it
    #[arg(long)]
    dry_run: bool,
}

/// Compact text logs by default; `NOTIFY_LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        let ansi = std::io::stdout().is_terminal();
        registry.with(fmt::layer().compact().with_ansi(ansi)).init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<PipelineOutcome> {
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.site_url {
        settings.site_url = url;
    }
    let credentials = PushCredentialsConfig::from_env();

    let source = ArticleSource::read(&cli.article).await?;

    let prober = HttpProber::new(settings.poll.probe_timeout)?;
    let dispatcher = OneSignalDispatcher::new(&settings.push)?;
    let clock = TokioClock;

    Pipeline::new(&settings, &credentials, &prober, &clock, &dispatcher)
        .dry_run(cli.dry_run)
        .run(&source)
        .await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env for local runs; CI injects real env vars.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => {
            info!(outcome = outcome.label(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
