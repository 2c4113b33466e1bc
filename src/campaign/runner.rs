//! Batch execution loop.

use crate::types::{Cursor, Event, RunReport};
use crate::{Result, roster, rotation, template};
use std::time::Duration;
use tokio::time::Instant;

use super::CampaignMailer;

impl CampaignMailer {
    /// Execute one bounded batch from the given cursor position
    ///
    /// The caller holds the single-flight permit. Recipient processing is
    /// strictly sequential: each send completes and its cursor write commits
    /// before the next send begins, which is what makes resumption safe.
    pub(crate) async fn execute_batch(&self, cursor: Cursor, limit: u64) -> Result<RunReport> {
        let config = &self.config.campaign;
        let started_at = chrono::Utc::now().timestamp();
        let deadline = Instant::now() + self.config.batch.time_budget;

        {
            let mut snapshot = self.snapshot.write().await;
            snapshot.total_sent = cursor.total_sent;
            snapshot.sent_this_run = 0;
            snapshot.last_receiver = cursor.last_receiver.clone();
            snapshot.last_sender = cursor.last_sender.clone();
            snapshot.started_at = Some(started_at);
        }

        tracing::info!(
            total_sent = cursor.total_sent,
            target = config.target_total,
            limit,
            "campaign batch starting"
        );
        self.event_tx
            .send(Event::BatchStarted {
                limit,
                total_sent: cursor.total_sent,
            })
            .ok();

        // Setup: everything is fetched before the first send, so a storage
        // failure aborts the run with no partial cursor mutation.
        let suppression = roster::SuppressionSet::parse(
            &self.store.fetch(&self.config.storage.suppression_key).await?,
        );
        let recipients =
            roster::parse_recipients(&self.store.fetch(&self.config.storage.recipients_key).await?);
        let html_template = self.store.fetch(&self.config.storage.template_key).await?;

        let start_index = roster::resume_index(&recipients, cursor.last_receiver.as_deref());
        let remaining = config.target_total - cursor.total_sent;
        let limit = limit.min(remaining);

        let mut total_sent = cursor.total_sent;
        let mut last_sender = cursor.last_sender.clone();
        let mut sent_this_run = 0u64;
        let mut failed_this_run = 0u64;
        let mut attempted = 0u64;

        for recipient in recipients.iter().skip(start_index) {
            if attempted >= limit {
                tracing::info!(attempted, "batch limit reached, stopping cleanly");
                break;
            }
            if Instant::now() >= deadline {
                tracing::info!(sent = sent_this_run, "time budget exhausted, stopping cleanly");
                break;
            }
            if suppression.contains(&recipient.email) {
                tracing::debug!(email = %recipient.email, "skipping suppressed recipient");
                continue;
            }

            attempted += 1;
            let from = rotation::next_sender(&config.senders, last_sender.as_deref());
            let unsubscribe = template::unsubscribe_url(&config.unsubscribe_base_url, &recipient.email);
            let html = template::render(&html_template, &recipient.username, &unsubscribe);

            match self
                .sender
                .send(from, &recipient.email, &config.subject, &html)
                .await
            {
                Ok(()) => {
                    total_sent += 1;
                    // The send is only "done" once the cursor write commits;
                    // a persistence failure here aborts the run.
                    self.db
                        .advance_cursor(total_sent, &recipient.email, from)
                        .await?;
                    let from = from.to_string();
                    last_sender = Some(from.clone());
                    sent_this_run += 1;

                    tracing::info!(email = %recipient.email, sender = %from, total_sent, "email sent");
                    {
                        let mut snapshot = self.snapshot.write().await;
                        snapshot.total_sent = total_sent;
                        snapshot.sent_this_run = sent_this_run;
                        snapshot.last_receiver = Some(recipient.email.clone());
                        snapshot.last_sender = Some(from.clone());
                    }
                    self.event_tx
                        .send(Event::EmailSent {
                            email: recipient.email.clone(),
                            sender: from,
                            total_sent,
                        })
                        .ok();

                    // Courtesy pacing toward the rate-limited provider
                    tokio::time::sleep(send_jitter(
                        self.config.batch.send_delay_min,
                        self.config.batch.send_delay_max,
                    ))
                    .await;
                }
                Err(e) => {
                    // Non-fatal: the recipient stays pending because the
                    // cursor was not advanced past them.
                    failed_this_run += 1;
                    tracing::warn!(email = %recipient.email, error = %e, "delivery failed, recipient stays pending");
                    self.event_tx
                        .send(Event::EmailFailed {
                            email: recipient.email.clone(),
                            error: e.to_string(),
                        })
                        .ok();
                }
            }
        }

        let report = RunReport {
            sent: sent_this_run,
            failed: failed_this_run,
            total_sent,
            suppressed: suppression.len(),
            adjusted: total_sent + suppression.len(),
            target: config.target_total,
        };

        tracing::info!(
            sent = report.sent,
            failed = report.failed,
            adjusted = report.adjusted,
            target = report.target,
            "campaign progress"
        );

        self.send_summary(&report, last_sender.as_deref()).await;
        self.event_tx
            .send(Event::BatchFinished {
                sent: report.sent,
                failed: report.failed,
                adjusted: report.adjusted,
                target: report.target,
            })
            .ok();

        Ok(report)
    }
}

/// Randomized inter-send delay within the configured bounds
fn send_jitter(min: Duration, max: Duration) -> Duration {
    if min >= max {
        return min;
    }
    let millis = {
        use rand::Rng;
        rand::thread_rng().gen_range(min.as_millis() as u64..=max.as_millis() as u64)
    };
    Duration::from_millis(millis)
}
