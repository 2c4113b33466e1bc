//! Campaign cursor records: total sent, last receiver, last sender.

use crate::error::DatabaseError;
use crate::types::Cursor;
use crate::{Error, Result};

use super::Database;

/// Record key for the total confirmed send count
const KEY_TOTAL_SENT: &str = "total_sent";
/// Record key for the most recent successfully-sent recipient
const KEY_LAST_RECEIVER: &str = "last_receiver";
/// Record key for the sender identity used for the most recent send
const KEY_LAST_SENDER: &str = "last_sender";

impl Database {
    /// Read the campaign cursor
    ///
    /// Missing records default to zero/empty; absence is never an error. An
    /// unparseable sent count is treated as zero with a warning rather than
    /// failing the run.
    pub async fn read_cursor(&self) -> Result<Cursor> {
        let total_sent = match self.read_record(KEY_TOTAL_SENT).await? {
            Some(value) => value.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(value = %value, "unparseable total_sent record, treating as 0");
                0
            }),
            None => 0,
        };

        Ok(Cursor {
            total_sent,
            last_receiver: self.read_record(KEY_LAST_RECEIVER).await?,
            last_sender: self.read_record(KEY_LAST_SENDER).await?,
        })
    }

    /// Durably advance the cursor after a confirmed send
    ///
    /// All three records are written in a single transaction so sender
    /// rotation can never skew from recipient progress. The caller must not
    /// treat the send as done until this returns `Ok`; a write failure here
    /// is fatal to the current run.
    pub async fn advance_cursor(
        &self,
        total_sent: u64,
        last_receiver: &str,
        last_sender: &str,
    ) -> Result<()> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to begin cursor transaction: {}",
                e
            )))
        })?;

        let now = chrono::Utc::now().timestamp();
        for (key, value) in [
            (KEY_TOTAL_SENT, total_sent.to_string()),
            (KEY_LAST_RECEIVER, last_receiver.to_string()),
            (KEY_LAST_SENDER, last_sender.to_string()),
        ] {
            sqlx::query(
                r#"
                INSERT INTO campaign_state (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET value = ?, updated_at = ?
                "#,
            )
            .bind(key)
            .bind(&value)
            .bind(now)
            .bind(&value)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to write cursor record '{}': {}",
                    key, e
                )))
            })?;
        }

        tx.commit().await.map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to commit cursor transaction: {}",
                e
            )))
        })?;

        Ok(())
    }

    /// Read a single scalar cursor record
    async fn read_record(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar(
            r#"
            SELECT value FROM campaign_state WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to read cursor record '{}': {}",
                key, e
            )))
        })
    }
}
