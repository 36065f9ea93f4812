// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use axum::Extension;
use serde_json::{json, Value};
use sqlx::Row;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - identity of the current caller.
///
/// Identity comes from the verified token. The profile block is a
/// best-effort read through the session-bound connection, so the caller
/// only ever sees rows their own credential is allowed to see; when the
/// store is unreachable the claims alone are returned.
pub async fn session_whoami(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let profile = match fetch_profile(&user).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::debug!("whoami profile lookup skipped: {}", e);
            None
        }
    };

    Ok(ApiResponse::success(json!({
        "id": user.user_id,
        "email": user.email,
        "user_type": user.user_type,
        "profile": profile,
    })))
}

async fn fetch_profile(user: &AuthUser) -> Result<Option<Value>, DatabaseError> {
    let mut tx = DatabaseManager::bind_session(&user.claims).await?;

    let row = sqlx::query("SELECT email, user_type, created_at FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(row.map(|row| {
        json!({
            "email": row.get::<String, _>("email"),
            "user_type": row.get::<String, _>("user_type"),
            "created_at": row.get::<chrono::DateTime<chrono::Utc>, _>("created_at"),
        })
    }))
}
