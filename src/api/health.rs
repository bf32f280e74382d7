use crate::error::Result;
use crate::state::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// Liveness check; answers once the repository responds.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>> {
    state.repository.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}
