// handlers/elevated/logs/health.rs - GET /api/audit/health handler

use axum::response::Json;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;

/// Liveness of the audit store as seen through the privileged connection.
pub async fn audit_health() -> Result<Json<Value>, ApiError> {
    DatabaseManager::privileged_health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}
