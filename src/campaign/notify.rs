//! End-of-run operator summary notification.

use crate::rotation;
use crate::types::{Event, RunReport};

use super::CampaignMailer;

impl CampaignMailer {
    /// Send the end-of-run summary to the operator address
    ///
    /// Uses the current rotation position as the sending identity. A
    /// notification failure is logged and broadcast but never affects
    /// campaign state or the run's outcome.
    pub(crate) async fn send_summary(&self, report: &RunReport, last_sender: Option<&str>) {
        let config = &self.config.campaign;
        let from = rotation::next_sender(&config.senders, last_sender);

        let subject = if report.target_reached() {
            "Email batch complete"
        } else {
            "Email batch incomplete"
        };
        let body = format!(
            "<p>Sent={}, Failed={}, Total={}, Unsub={}, Adjusted={}, Target={}</p>",
            report.sent,
            report.failed,
            report.total_sent,
            report.suppressed,
            report.adjusted,
            report.target
        );

        match self
            .sender
            .send(from, &config.notify_email, subject, &body)
            .await
        {
            Ok(()) => {
                tracing::debug!(to = %config.notify_email, "summary notification sent");
            }
            Err(e) => {
                tracing::warn!(to = %config.notify_email, error = %e, "failed to send summary notification");
                self.event_tx
                    .send(Event::NotificationFailed {
                        error: e.to_string(),
                    })
                    .ok();
            }
        }
    }
}
