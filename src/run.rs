use thiserror::Error;
use tracing::info;

use crate::config::MonitorConfig;
use crate::filtering::select;
use crate::formatting::compose_message;
use crate::listings::{Snapshot, SnapshotError};
use crate::notifications::{DispatchReport, NotificationDispatcher};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Result of one monitoring run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NoMatches { scanned: usize },
    /// Matches were found but only printed, not dispatched.
    DryRun { matched: usize, message: String },
    Notified { matched: usize, report: DispatchReport },
}

impl RunOutcome {
    /// False only when a configured channel failed to deliver.
    pub fn is_success(&self) -> bool {
        match self {
            RunOutcome::NoMatches { .. } | RunOutcome::DryRun { .. } => true,
            RunOutcome::Notified { report, .. } => report.is_success(),
        }
    }
}

/// Loads the configured snapshot and processes it.
pub async fn run_once(
    config: &MonitorConfig,
    dispatcher: &NotificationDispatcher,
    dry_run: bool,
) -> Result<RunOutcome, RunError> {
    let snapshot = Snapshot::load(&config.snapshot_path)?;
    Ok(process_snapshot(&snapshot, config, dispatcher, dry_run).await)
}

/// Selection, formatting and dispatch for an already loaded snapshot.
pub async fn process_snapshot(
    snapshot: &Snapshot,
    config: &MonitorConfig,
    dispatcher: &NotificationDispatcher,
    dry_run: bool,
) -> RunOutcome {
    let matched = select(snapshot.listings(), &config.filters, &config.field_map);
    if matched.is_empty() {
        info!(scanned = snapshot.len(), "No servers matched the filter criteria.");
        return RunOutcome::NoMatches { scanned: snapshot.len() };
    }

    info!(
        scanned = snapshot.len(),
        matched = matched.len(),
        ids = ?matched.iter().map(|l| l.display_id()).collect::<Vec<_>>(),
        "Servers matched the filter criteria."
    );
    let message = compose_message(matched.iter().copied(), &config.field_map, &config.labels);

    if dry_run {
        return RunOutcome::DryRun {
            matched: matched.len(),
            message,
        };
    }

    let report = dispatcher.dispatch(&message, &config.notification).await;
    if report.is_success() {
        info!(channels = %report, "Notification sent successfully.");
    } else {
        info!(channels = %report, "Failed to send notification.");
    }
    RunOutcome::Notified {
        matched: matched.len(),
        report,
    }
}
