//! Core campaign engine split into focused submodules.
//!
//! The `CampaignMailer` struct and its methods are organized by domain:
//! - [`guard`] - Single-flight run guard
//! - [`runner`] - Batch execution loop
//! - [`notify`] - End-of-run operator summary

mod guard;
mod notify;
mod runner;


use crate::config::Config;
use crate::db::Database;
use crate::delivery::EmailSender;
use crate::error::Result;
use crate::storage::ObjectStore;
use crate::types::{Event, RunOutcome, RunSnapshot, StartOutcome};
use guard::RunGuard;
use std::sync::Arc;

/// Main campaign engine instance (cloneable - all fields are Arc-wrapped)
///
/// Executes one bounded batch of a long-running campaign per invocation,
/// safely resumable: progress is persisted per confirmed send, so a restart
/// or timeout mid-batch continues exactly where the previous run stopped.
#[derive(Clone)]
pub struct CampaignMailer {
    /// Database instance for cursor persistence (wrapped in Arc for sharing across tasks)
    /// Public for integration tests to inspect cursor state
    pub db: Arc<Database>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Object storage capability (recipient table, suppression list, template)
    pub(crate) store: Arc<dyn ObjectStore>,
    /// Delivery provider capability
    pub(crate) sender: Arc<dyn EmailSender>,
    /// Single-flight guard for batch runs
    pub(crate) guard: RunGuard,
    /// Diagnostic run snapshot (last-write-wins; the cursor is authoritative)
    pub(crate) snapshot: Arc<tokio::sync::RwLock<RunSnapshot>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl CampaignMailer {
    /// Create a new campaign engine
    ///
    /// Validates the configuration and opens (creating if necessary) the
    /// cursor database before returning.
    pub async fn new(
        config: Config,
        store: Arc<dyn ObjectStore>,
        sender: Arc<dyn EmailSender>,
    ) -> Result<Self> {
        config.validate()?;
        let db = Database::new(&config.database_path).await?;
        let (event_tx, _) = tokio::sync::broadcast::channel(256);

        Ok(Self {
            db: Arc::new(db),
            config: Arc::new(config),
            store,
            sender,
            guard: RunGuard::new(),
            snapshot: Arc::new(tokio::sync::RwLock::new(RunSnapshot::default())),
            event_tx,
        })
    }

    /// Run one bounded batch to completion
    ///
    /// `limit` caps delivery attempts this run (defaults to
    /// `batch.default_limit`). Returns [`RunOutcome::Busy`] without starting
    /// if a run is already active, and [`RunOutcome::AlreadyComplete`]
    /// without sending if the campaign target has been reached.
    ///
    /// Setup failures (recipient list, suppression list, or template cannot
    /// be fetched) abort before any send with no cursor mutation. A cursor
    /// persistence failure aborts mid-run. Per-recipient delivery failures
    /// are logged and skipped; those recipients stay pending.
    pub async fn run_batch(&self, limit: Option<u64>) -> Result<RunOutcome> {
        let Some(permit) = self.guard.try_acquire() else {
            tracing::info!("batch run rejected, another run is in progress");
            return Ok(RunOutcome::Busy);
        };
        // Permit is held for the duration of the run; dropped on every path
        let _permit = permit;

        let cursor = self.db.read_cursor().await?;
        if cursor.total_sent >= self.config.campaign.target_total {
            tracing::info!(
                total_sent = cursor.total_sent,
                target = self.config.campaign.target_total,
                "campaign already completed"
            );
            return Ok(RunOutcome::AlreadyComplete);
        }

        let limit = limit.unwrap_or(self.config.batch.default_limit);
        let report = self.execute_batch(cursor, limit).await?;
        Ok(RunOutcome::Finished(report))
    }

    /// Trigger a batch run in the background
    ///
    /// Checks the single-flight guard and remaining capacity up front, then
    /// spawns the run and returns immediately. Errors inside the spawned run
    /// are logged and the guard is released (fail-safe), so future runs can
    /// proceed.
    pub async fn start_batch(&self, limit: Option<u64>) -> Result<StartOutcome> {
        let Some(permit) = self.guard.try_acquire() else {
            return Ok(StartOutcome::Busy);
        };

        let cursor = self.db.read_cursor().await?;
        if cursor.total_sent >= self.config.campaign.target_total {
            return Ok(StartOutcome::AlreadyComplete);
        }

        let limit = limit.unwrap_or(self.config.batch.default_limit);
        let mailer = self.clone();
        tokio::spawn(async move {
            // Keep the permit alive until the spawned run finishes
            let _permit = permit;
            match mailer.execute_batch(cursor, limit).await {
                Ok(report) => {
                    tracing::info!(
                        sent = report.sent,
                        failed = report.failed,
                        adjusted = report.adjusted,
                        target = report.target,
                        "background batch finished"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "background batch failed");
                }
            }
        });

        Ok(StartOutcome::Started)
    }

    /// Current run status snapshot
    ///
    /// The `running` flag reflects the single-flight guard; the remaining
    /// fields are diagnostic last-write-wins values from the current or most
    /// recent run.
    pub async fn status(&self) -> RunSnapshot {
        let mut snapshot = self.snapshot.read().await.clone();
        snapshot.running = self.guard.is_active();
        snapshot
    }

    /// Subscribe to campaign events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Close the cursor database pool
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down campaign mailer");
        self.db.pool().close().await;
    }
}
