//! Core types and events for bulk-mailer

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single campaign recipient parsed from the recipient table
///
/// The `Email`/`Username` header names match the recipient CSV produced by
/// the upstream export. Rows missing either field are dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recipient {
    /// Recipient address (unique key within a run)
    #[serde(rename = "Email")]
    pub email: String,
    /// Display handle substituted into the message template
    #[serde(rename = "Username")]
    pub username: String,
}

/// Durable campaign cursor
///
/// Read at run start and advanced transactionally after each confirmed send.
/// `total_sent` only ever increases; `last_receiver`, once set, identifies the
/// most recent successfully-sent recipient in list order, and iteration
/// resumes immediately after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Total number of confirmed sends across all runs
    pub total_sent: u64,
    /// Address of the most recent successfully-sent recipient (None before the first send)
    pub last_receiver: Option<String>,
    /// Sender identity used for the most recent successful send
    pub last_sender: Option<String>,
}

/// In-memory run status snapshot
///
/// Diagnostic view of the current (or most recent) run, queryable through the
/// status API while a run is active. Last-write-wins; the durable [`Cursor`]
/// is the authoritative record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RunSnapshot {
    /// Whether a run is currently active
    pub running: bool,
    /// Total confirmed sends across all runs (mirrors the cursor)
    pub total_sent: u64,
    /// Confirmed sends in the current/most recent run
    pub sent_this_run: u64,
    /// Most recent successfully-sent recipient
    pub last_receiver: Option<String>,
    /// Sender identity used for the most recent successful send
    pub last_sender: Option<String>,
    /// Unix timestamp when the current/most recent run started
    pub started_at: Option<i64>,
}

/// Summary of one completed batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RunReport {
    /// Confirmed sends in this run
    pub sent: u64,
    /// Delivery attempts that failed in this run (recipients left pending)
    pub failed: u64,
    /// Total confirmed sends across all runs after this run
    pub total_sent: u64,
    /// Size of the suppression set
    pub suppressed: u64,
    /// Adjusted progress: `total_sent + suppressed`
    pub adjusted: u64,
    /// Configured campaign target total
    pub target: u64,
}

impl RunReport {
    /// Whether adjusted progress has reached the campaign target
    #[must_use]
    pub fn target_reached(&self) -> bool {
        self.adjusted >= self.target
    }
}

/// Outcome of invoking a batch run to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Another run is already in progress; nothing was started
    Busy,
    /// The campaign target was already reached; zero emails sent
    AlreadyComplete,
    /// The batch ran (fully or stopped early at its bound) and produced a report
    Finished(RunReport),
}

/// Outcome of triggering a batch run in the background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new batch run was started
    Started,
    /// Another run is already in progress
    Busy,
    /// The campaign target was already reached; no run started
    AlreadyComplete,
}

/// Events emitted during campaign execution
///
/// Consumers subscribe via [`crate::CampaignMailer::subscribe`]. Events are
/// diagnostic; cursor persistence is the authoritative record of progress.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A batch run started
    BatchStarted {
        /// Batch-size limit for this run
        limit: u64,
        /// Total confirmed sends before this run
        total_sent: u64,
    },

    /// A message was delivered and the cursor durably advanced
    EmailSent {
        /// Recipient address
        email: String,
        /// Sender identity used
        sender: String,
        /// Total confirmed sends after this send
        total_sent: u64,
    },

    /// A delivery attempt failed; the recipient stays pending for the next run
    EmailFailed {
        /// Recipient address
        email: String,
        /// Provider error message
        error: String,
    },

    /// A batch run finished (exhausted, limit reached, or time budget hit)
    BatchFinished {
        /// Confirmed sends in this run
        sent: u64,
        /// Failed delivery attempts in this run
        failed: u64,
        /// Adjusted progress after this run
        adjusted: u64,
        /// Configured campaign target
        target: u64,
    },

    /// The operator summary notification could not be sent
    NotificationFailed {
        /// Delivery error message
        error: String,
    },
}
