use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One immutable row of the `admin_logs` table. Rows are only ever
/// inserted by the audit recorder; nothing in this service updates or
/// deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Actor identity (admin email)
    pub admin: String,
    /// Short action verb, e.g. "Login", "UpdateRestaurant", "ExportLogs"
    pub action: String,
    /// Free-text summary, optionally enriched with client ip/user-agent
    pub details: String,
}
