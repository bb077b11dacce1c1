use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResult, IntoApiResponse};
use crate::state::AppState;

/// GET /health - liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    state.gateway.ping().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(json!({ "status": "ok" }).into_api_response())
}
