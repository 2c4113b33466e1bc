//! Configuration types for bulk-mailer

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Campaign identity and content configuration
///
/// Groups the settings that define what gets sent and to what target.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CampaignConfig {
    /// Ordered pool of verified sender identities, rotated round-robin (must be non-empty)
    pub senders: Vec<String>,

    /// Subject line for every campaign message
    pub subject: String,

    /// Total number of addresses the campaign should reach (suppressed included)
    pub target_total: u64,

    /// Operator address that receives the end-of-run summary
    pub notify_email: String,

    /// Base URL for per-recipient unsubscribe links; the recipient address is
    /// appended as an `email` query parameter
    pub unsubscribe_base_url: String,
}

/// Object storage keys for campaign inputs
///
/// The campaign fetches all three documents through the configured
/// [`crate::storage::ObjectStore`] at the start of every run.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageConfig {
    /// Key of the recipient table (CSV with `Email`/`Username` headers)
    #[serde(default = "default_recipients_key")]
    pub recipients_key: String,

    /// Key of the suppression list (newline-delimited addresses)
    #[serde(default = "default_suppression_key")]
    pub suppression_key: String,

    /// Key of the HTML message template
    #[serde(default = "default_template_key")]
    pub template_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            recipients_key: default_recipients_key(),
            suppression_key: default_suppression_key(),
            template_key: default_template_key(),
        }
    }
}

/// Batch execution limits and pacing
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchConfig {
    /// Default batch-size limit when the trigger supplies none (default: 100)
    #[serde(default = "default_batch_limit")]
    pub default_limit: u64,

    /// Wall-clock budget for a single run; checked before each send (default: 720s)
    #[serde(default = "default_time_budget")]
    #[schema(value_type = Object)]
    pub time_budget: Duration,

    /// Minimum randomized delay between consecutive sends (default: 200ms)
    ///
    /// The delay is a rate-limit courtesy toward the delivery provider, not a
    /// correctness requirement.
    #[serde(default = "default_send_delay_min")]
    #[schema(value_type = Object)]
    pub send_delay_min: Duration,

    /// Maximum randomized delay between consecutive sends (default: 500ms)
    #[serde(default = "default_send_delay_max")]
    #[schema(value_type = Object)]
    pub send_delay_max: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_batch_limit(),
            time_budget: default_time_budget(),
            send_delay_min: default_send_delay_min(),
            send_delay_max: default_send_delay_max(),
        }
    }
}

/// REST API server configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:6789)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

/// Main configuration for [`crate::CampaignMailer`]
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Campaign identity and content
    pub campaign: CampaignConfig,

    /// Object storage keys for campaign inputs
    #[serde(default)]
    pub storage: StorageConfig,

    /// Batch execution limits and pacing
    #[serde(default)]
    pub batch: BatchConfig,

    /// Path to the SQLite cursor database (default: "./data/bulk-mailer.db")
    #[serde(default = "default_database_path")]
    #[schema(value_type = String)]
    pub database_path: PathBuf,

    /// REST API server settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Validate the configuration, returning the first problem found
    ///
    /// Called by [`crate::CampaignMailer::new`] before anything is opened
    /// or fetched, so misconfiguration fails fast rather than mid-batch.
    pub fn validate(&self) -> Result<()> {
        if self.campaign.senders.is_empty() {
            return Err(Error::Config {
                message: "sender pool must not be empty".to_string(),
                key: Some("campaign.senders".to_string()),
            });
        }
        if self.campaign.subject.trim().is_empty() {
            return Err(Error::Config {
                message: "subject must not be empty".to_string(),
                key: Some("campaign.subject".to_string()),
            });
        }
        if self.campaign.target_total == 0 {
            return Err(Error::Config {
                message: "target total must be greater than zero".to_string(),
                key: Some("campaign.target_total".to_string()),
            });
        }
        if url::Url::parse(&self.campaign.unsubscribe_base_url).is_err() {
            return Err(Error::Config {
                message: format!(
                    "unsubscribe base URL is not a valid URL: {}",
                    self.campaign.unsubscribe_base_url
                ),
                key: Some("campaign.unsubscribe_base_url".to_string()),
            });
        }
        if self.batch.default_limit == 0 {
            return Err(Error::Config {
                message: "default batch limit must be greater than zero".to_string(),
                key: Some("batch.default_limit".to_string()),
            });
        }
        if self.batch.send_delay_min > self.batch.send_delay_max {
            return Err(Error::Config {
                message: "minimum send delay exceeds maximum send delay".to_string(),
                key: Some("batch.send_delay_min".to_string()),
            });
        }
        Ok(())
    }
}

fn default_recipients_key() -> String {
    "recipients.csv".to_string()
}

fn default_suppression_key() -> String {
    "unsubscribed.txt".to_string()
}

fn default_template_key() -> String {
    "template.html".to_string()
}

fn default_batch_limit() -> u64 {
    100
}

fn default_time_budget() -> Duration {
    Duration::from_secs(720)
}

fn default_send_delay_min() -> Duration {
    Duration::from_millis(200)
}

fn default_send_delay_max() -> Duration {
    Duration::from_millis(500)
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/bulk-mailer.db")
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6789))
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
