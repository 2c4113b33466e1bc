//! Recipient source: suppression list and recipient table parsing
//!
//! Both documents are fetched from object storage as text at the start of
//! every run. Parsing is tolerant: blank suppression lines are ignored and
//! recipient rows missing an email or username are dropped without failing
//! the run.

use crate::types::Recipient;
use std::collections::HashSet;

/// Set of normalized (lower-cased, trimmed) addresses that must never be
/// sent to
///
/// Suppressed recipients are excluded from delivery and counted toward
/// adjusted campaign progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    addresses: HashSet<String>,
}

impl SuppressionSet {
    /// Parse a newline-delimited suppression list
    ///
    /// Entries are trimmed and lower-cased; blank lines (including trailing
    /// ones) are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let addresses = text
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Self { addresses }
    }

    /// Whether `email` is suppressed (comparison is case- and
    /// whitespace-insensitive)
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.addresses.contains(&email.trim().to_lowercase())
    }

    /// Number of suppressed addresses
    #[must_use]
    pub fn len(&self) -> u64 {
        self.addresses.len() as u64
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Parse the recipient table
///
/// The table is a CSV document keyed by `Email`/`Username` headers. Rows
/// that fail to deserialize or whose email/username is empty after trimming
/// are dropped, not treated as errors; list order is preserved.
#[must_use]
pub fn parse_recipients(text: &str) -> Vec<Recipient> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut recipients = Vec::new();
    for row in reader.deserialize::<Recipient>() {
        match row {
            Ok(recipient) if !recipient.email.is_empty() && !recipient.username.is_empty() => {
                recipients.push(recipient);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "dropping unparseable recipient row");
            }
        }
    }
    recipients
}

/// Resolve the resume position for this run
///
/// Returns the index of the first recipient to consider. An empty cursor
/// starts at the beginning. When the cursor names a recipient, iteration
/// resumes immediately after its position in list order.
///
/// If the cursor's recipient is no longer present (the list changed between
/// runs), the run restarts from the beginning with a warning. Restarting can
/// re-send to recipients whose cursor record was orphaned, but silently
/// skipping the rest of the list would strand the campaign permanently.
#[must_use]
pub fn resume_index(recipients: &[Recipient], last_receiver: Option<&str>) -> usize {
    let Some(last) = last_receiver else {
        return 0;
    };
    match recipients.iter().position(|r| r.email == last) {
        Some(position) => position + 1,
        None => {
            tracing::warn!(
                last_receiver = %last,
                "cursor recipient not found in current list, restarting from the beginning"
            );
            0
        }
    }
}
