//! Error types for bulk-mailer
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Database, Storage, Delivery, etc.)
//! - Structured error messages suitable for API responses and logs

use thiserror::Error;

/// Result type alias for bulk-mailer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bulk-mailer
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "campaign.senders")
        key: Option<String>,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Object storage fetch failed (recipient list, suppression list, template)
    #[error("storage error: {0}")]
    Storage(String),

    /// Delivery provider rejected or failed a send
    #[error("delivery error: {0}")]
    Delivery(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}
