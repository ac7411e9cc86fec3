//! Route table and HTTP handlers

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use sg_core::api::{
    ExecuteRequest, ExecuteResponse, LogsQuery, LogsResponse, ServiceInfo, ValidationResponse,
};
use sg_core::config::CorsConfig;
use sg_core::document::PanelDocument;
use sg_core::RequestId;

use super::error::ApiError;
use super::ws;
use crate::state::GatewayState;

/// API version reported by `GET /api/`
pub const API_VERSION: &str = "1.0";

/// Build the full application router
pub fn router(state: Arc<GatewayState>) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/api", get(service_info))
        .route("/api/", get(service_info))
        .route("/api/ssh/execute", post(execute_ssh))
        .route("/api/ssh/logs", get(ssh_logs))
        .route("/api/ws/:client_id", get(ws::session_channel))
        .route("/api/config/validate", post(validate_config))
        .route("/api/config/:name", get(fetch_config))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "sshgate gateway".to_string(),
        version: API_VERSION.to_string(),
    })
}

async fn execute_ssh(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let Json(request) = payload?;
    request.ssh.validate()?;

    tracing::info!(
        "Executing '{}' on {} for button {}",
        request.ssh.command,
        request.ssh.address(),
        request.button_id
    );
    let result = state
        .dispatcher
        .execute_now(request.ssh, RequestId::new(request.button_id))
        .await;

    Ok(Json(ExecuteResponse::from(&result)))
}

async fn ssh_logs(
    State(state): State<Arc<GatewayState>>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Result<Json<LogsResponse>, ApiError> {
    let Query(query) = query?;
    let limit = state.config.audit.resolve_limit(query.limit);
    let logs = state.audit.recent_records(limit).await?;
    Ok(Json(LogsResponse { logs }))
}

async fn fetch_config(
    State(state): State<Arc<GatewayState>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let document = state.delivery.fetch(&name).await?;
    Ok(Json(document))
}

async fn validate_config(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<PanelDocument>, JsonRejection>,
) -> Result<Json<ValidationResponse>, ApiError> {
    let Json(document) = payload?;

    if let Some(violation) = state.delivery.validate_structure(&document).first() {
        return Err(ApiError::BadRequest(violation.to_string()));
    }

    Ok(Json(ValidationResponse {
        valid: true,
        message: "Configuration is valid".to_string(),
    }))
}
