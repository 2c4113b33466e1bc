//! Database layer for bulk-mailer
//!
//! Handles SQLite persistence for the campaign cursor.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — Database lifecycle, schema migrations
//! - [`cursor`] — Campaign cursor records (total sent, last receiver, last sender)

use sqlx::sqlite::SqlitePool;

mod cursor;
mod migrations;

/// SQLite-backed durable state store
///
/// Holds the three campaign cursor records as independent key-value rows;
/// a missing row means "zero/empty", never an error. The store guarantees
/// read-after-write consistency within a single process, which is all the
/// sequential campaign loop relies on.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
