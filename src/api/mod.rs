//! REST API server module
//!
//! Exposes the campaign trigger and status query over HTTP:
//! - `POST /campaign/run` - Trigger one bounded batch run
//! - `GET /campaign/status` - Current run snapshot
//! - `GET /health` - Health check
//! - `GET /openapi.json` - OpenAPI specification

use crate::{CampaignMailer, Config, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod routes;
pub mod state;

pub use state::AppState;

/// OpenAPI documentation for the campaign API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "bulk-mailer API",
        description = "Resumable bulk email campaign engine"
    ),
    paths(
        routes::run_campaign,
        routes::campaign_status,
        routes::health_check,
        routes::openapi_spec,
    ),
    components(schemas(crate::types::RunSnapshot, routes::RunRequest))
)]
pub struct ApiDoc;

/// Create the API router with all route definitions
pub fn create_router(mailer: Arc<CampaignMailer>, config: Arc<Config>) -> Router {
    let state = AppState::new(mailer, config.clone());

    let router = Router::new()
        .route("/campaign/run", post(routes::run_campaign))
        .route("/campaign/status", get(routes::campaign_status))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.api.cors_enabled {
        let cors = build_cors_layer(&config.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// Allows the specified origins (supporting "*" for any origin), all methods,
/// and all headers for cross-origin requests.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Creates a TCP listener, binds it to the configured address, and serves
/// the API router until the server is shut down.
pub async fn start_api_server(mailer: Arc<CampaignMailer>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(mailer, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
