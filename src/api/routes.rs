//! Route handlers for the campaign API.

use crate::api::AppState;
use crate::types::StartOutcome;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

/// Request body for triggering a batch run
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RunRequest {
    /// Maximum delivery attempts this run (defaults to the configured batch limit)
    pub limit: Option<u64>,
}

/// POST /campaign/run - Trigger one bounded batch run
///
/// The run executes in the background; progress is visible through
/// `GET /campaign/status` and durable cursor state.
#[utoipa::path(
    post,
    path = "/campaign/run",
    tag = "campaign",
    request_body(content = RunRequest, description = "Optional batch limit"),
    responses(
        (status = 202, description = "Batch run started"),
        (status = 200, description = "Campaign already complete, nothing to send"),
        (status = 409, description = "A run is already in progress"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn run_campaign(
    State(state): State<AppState>,
    body: Option<Json<RunRequest>>,
) -> Response {
    let limit = body.and_then(|Json(request)| request.limit);
    match state.mailer.start_batch(limit).await {
        Ok(StartOutcome::Started) => {
            (StatusCode::ACCEPTED, Json(json!({"status": "started"}))).into_response()
        }
        Ok(StartOutcome::Busy) => (
            StatusCode::CONFLICT,
            Json(json!({"status": "busy", "message": "a campaign run is already in progress"})),
        )
            .into_response(),
        Ok(StartOutcome::AlreadyComplete) => (
            StatusCode::OK,
            Json(json!({"status": "complete", "message": "campaign target already reached"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to start campaign batch");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": {"code": "run_failed", "message": format!("Failed to start campaign batch: {}", e)}})),
            )
                .into_response()
        }
    }
}

/// GET /campaign/status - Current run snapshot
#[utoipa::path(
    get,
    path = "/campaign/status",
    tag = "campaign",
    responses(
        (status = 200, description = "Current run snapshot", body = crate::types::RunSnapshot)
    )
)]
pub async fn campaign_status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.mailer.status().await;
    (StatusCode::OK, Json(snapshot))
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification document")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(crate::api::ApiDoc::openapi())
}
