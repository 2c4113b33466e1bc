//! Application state for the API server

use crate::{CampaignMailer, Config};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the campaign engine and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The main CampaignMailer instance
    pub mailer: Arc<CampaignMailer>,

    /// Configuration (read access for route handlers)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(mailer: Arc<CampaignMailer>, config: Arc<Config>) -> Self {
        Self { mailer, config }
    }
}
