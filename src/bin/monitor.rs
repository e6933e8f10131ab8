// Entry point: one monitoring pass per invocation; scheduling is left to cron/systemd timers.

use auction_monitor::config::{MonitorConfig, Preset};
use auction_monitor::notifications::NotificationDispatcher;
use auction_monitor::run::{RunOutcome, run_once};
use auction_monitor::version::VERSION;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in profile: `auction` (SB_* variables) or `dedicated` (EN_* variables)
    #[arg(short, long, default_value = "auction")]
    preset: Preset,

    /// Read per-profile variables with this prefix instead of the preset's
    #[arg(long)]
    env_prefix: Option<String>,

    /// Directory for the rolling JSON log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Log to stdout only
    #[arg(long)]
    no_file_log: bool,

    /// Print the composed message instead of sending it
    #[arg(long)]
    dry_run: bool,
}

fn init_logging(args: &Args) {
    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Log to a file: JSON format, daily rotation
    let file_layer = (!args.no_file_log).then(|| {
        let file_appender = rolling::daily(&args.log_dir, "monitor.log");
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .json()
            .boxed()
    });

    // Default to `info` if RUST_LOG is not set.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    // Manually check for --version before full parsing to keep the output simple.
    if std::env::args().any(|arg| arg == "--version") {
        println!("auction-monitor version: {VERSION}");
        return Ok(ExitCode::SUCCESS);
    }

    let args = Args::parse();
    init_logging(&args);
    info!(version = VERSION, preset = %args.preset, "Starting auction monitor.");

    let config = match MonitorConfig::load(args.config.as_deref(), args.preset, args.env_prefix.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load monitor configuration.");
            return Err(e.into());
        }
    };

    let dispatcher = NotificationDispatcher::new()?;
    let outcome = match run_once(&config, &dispatcher, args.dry_run).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Monitoring run aborted.");
            return Err(e.into());
        }
    };

    if let RunOutcome::DryRun { message, .. } = &outcome {
        println!("{}\n\n{message}", config.notification.title);
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
