//! # bulk-mailer
//!
//! Resumable, rate-aware bulk email campaign engine.
//!
//! ## Design Philosophy
//!
//! bulk-mailer is designed to be:
//! - **Resumable** - Progress is persisted per confirmed send, so restarts,
//!   timeouts, and crashes mid-batch continue exactly where they stopped
//! - **Rate-aware** - Bounded batches, a wall-clock budget, and randomized
//!   inter-send pacing keep the engine polite toward delivery providers
//! - **Library-first** - The delivery provider and object store are trait
//!   seams; the embedded REST API is optional
//! - **Event-driven** - Consumers subscribe to campaign events, no polling
//!   required
//!
//! ## Quick Start
//!
//! ```no_run
//! use bulk_mailer::{CampaignMailer, Config, HttpEmailSender, HttpObjectStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config: Config = serde_json::from_str(&std::fs::read_to_string("config.json")?)?;
//!
//!     let store = Arc::new(HttpObjectStore::new("https://bucket.example.com/campaign/")?);
//!     let sender = Arc::new(HttpEmailSender::new("https://mail.example.com/api/", None)?);
//!     let mailer = Arc::new(CampaignMailer::new(config.clone(), store, sender).await?);
//!
//!     // Subscribe to events
//!     let mut events = mailer.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // Serve the trigger and status API until shutdown
//!     bulk_mailer::api::start_api_server(mailer, Arc::new(config)).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Core campaign engine (decomposed into focused submodules)
pub mod campaign;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Email delivery capability
pub mod delivery;
/// Error types
pub mod error;
/// Recipient source: suppression list and recipient table parsing
pub mod roster;
/// Round-robin sender rotation
pub mod rotation;
/// Object storage capability
pub mod storage;
/// Message personalization
pub mod template;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use campaign::CampaignMailer;
pub use config::{ApiConfig, BatchConfig, CampaignConfig, Config, StorageConfig};
pub use db::Database;
pub use delivery::{EmailSender, HttpEmailSender};
pub use error::{DatabaseError, Error, Result};
pub use roster::SuppressionSet;
pub use storage::{HttpObjectStore, ObjectStore};
pub use types::{Cursor, Event, Recipient, RunOutcome, RunReport, RunSnapshot, StartOutcome};

/// Helper function to run the campaign engine with graceful signal handling.
///
/// Waits for a termination signal and then calls the mailer's `shutdown()`
/// method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn run_with_shutdown(mailer: CampaignMailer) -> Result<()> {
    wait_for_signal().await;
    mailer.shutdown().await;
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
