// handlers/protected/delivery/profile.rs - GET /api/delivery/profile handler

use axum::Extension;
use serde_json::{json, Value};
use sqlx::Row;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/delivery/profile - courier-only profile view.
///
/// The read goes through the session-bound connection: row-level policies
/// restrict the courier to their own `delivery_profiles` row. Missing
/// profile data is not an error; registration may still be in progress.
pub async fn delivery_profile(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let profile = match fetch_profile(&user).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::debug!("delivery profile lookup skipped: {}", e);
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

    let row = sqlx::query(
        "SELECT first_name, last_name, phone, address_city FROM delivery_profiles WHERE user_id = $1",
    )
    .bind(user.user_id)
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(row.map(|row| {
        json!({
            "first_name": row.get::<Option<String>, _>("first_name"),
            "last_name": row.get::<Option<String>, _>("last_name"),
            "phone": row.get::<Option<String>, _>("phone"),
            "address_city": row.get::<Option<String>, _>("address_city"),
        })
    }))
}
