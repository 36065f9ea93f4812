use serde::Serialize;
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::AdminLogEntry;

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Audit store statement timed out")]
    StoreTimeout,
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Raw query parameters for the audit reader, as they arrive from the
/// route. Normalization (defaults, clamping, sort validation) happens in
/// the service so every caller gets the same behavior.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub admin: Option<String>,
    pub action: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[derive(Debug)]
pub struct LogPage {
    pub entries: Vec<AdminLogEntry>,
    pub pagination: Pagination,
}

/// Client context used to enrich audit details.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Recorder and reader over the append-only `admin_logs` table.
///
/// Both sides run on the privileged pool: the acting admin's own session
/// may be denied by row-level policies, the audit trail must not be. The
/// triggering request's session connection is never held across these
/// calls.
pub struct AuditService {
    pool: PgPool,
}

impl AuditService {
    pub fn new() -> Result<Self, AuditError> {
        let pool = DatabaseManager::privileged_pool()?;
        Ok(Self { pool })
    }

    /// Insert one audit entry. Each attempt gets a fresh id, so a retry
    /// after a reported failure can produce a duplicate entry; availability
    /// wins over exactness here.
    ///
    /// Returns `Ok(None)` when the inputs fail validation and the write is
    /// skipped (matching the recorder's never-disrupt contract).
    pub async fn record(
        &self,
        admin: &str,
        action: &str,
        details: &str,
        meta: Option<&RequestMeta>,
    ) -> Result<Option<Uuid>, AuditError> {
        let Some((admin, action, details)) = clean_inputs(admin, action, details, meta) else {
            return Ok(None);
        };

        let id = Uuid::new_v4();
        let insert = sqlx::query(
            r#"
            INSERT INTO admin_logs (id, timestamp, admin, action, details)
            VALUES ($1, now(), $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(&admin)
        .bind(&action)
        .bind(&details)
        .execute(&self.pool);

        let timeout = Duration::from_secs(config::config().database.store_timeout_secs);
        match tokio::time::timeout(timeout, insert).await {
            Ok(Ok(_)) => {
                tracing::info!("Admin action logged: {} by {}", action, admin);
                Ok(Some(id))
            }
            Ok(Err(e)) => Err(AuditError::Sqlx(e)),
            Err(_) => Err(AuditError::StoreTimeout),
        }
    }

    /// Fire-and-forget variant: spawns the insert so the triggering
    /// response never waits on, or fails because of, the audit store.
    /// Failures are logged and dropped; there is no retry queue.
    pub fn record_best_effort(
        admin: impl Into<String>,
        action: impl Into<String>,
        details: impl Into<String>,
        meta: Option<RequestMeta>,
    ) {
        let admin = admin.into();
        let action = action.into();
        let details = details.into();

        tokio::spawn(async move {
            match AuditService::new() {
                Ok(service) => {
                    if let Err(e) = service.record(&admin, &action, &details, meta.as_ref()).await {
                        tracing::warn!("Failed to log admin action ({} by {}): {}", action, admin, e);
                    }
                }
                Err(e) => {
                    tracing::warn!("Audit logging skipped: {}", e);
                }
            }
        });
    }

    /// Paginated, filtered, sorted read over the log. Same filters + sort +
    /// page always return the same slice while no rows are being inserted.
    pub async fn query(&self, query: &LogQuery) -> Result<LogPage, AuditError> {
        let audit_config = &config::config().audit;
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .limit
            .unwrap_or(audit_config.default_page_size)
            .clamp(1, audit_config.max_page_size);
        let direction = parse_sort(query.sort.as_deref())?;

        let (where_sql, params) = build_where(query);

        let count_sql = format!("SELECT COUNT(*) AS total FROM admin_logs{}", where_sql);
        let mut count_query = sqlx::query(&count_sql);
        for p in &params {
            count_query = count_query.bind(p);
        }

        let select_sql = format!(
            "SELECT id, timestamp, admin, action, details FROM admin_logs{} \
             ORDER BY timestamp {dir}, id {dir} LIMIT ${} OFFSET ${}",
            where_sql,
            params.len() + 1,
            params.len() + 2,
            dir = direction.to_sql(),
        );
        let mut select_query = sqlx::query_as::<_, AdminLogEntry>(&select_sql);
        for p in &params {
            select_query = select_query.bind(p);
        }
        select_query = select_query.bind(per_page).bind((page - 1) * per_page);

        let timeout = Duration::from_secs(config::config().database.store_timeout_secs);
        let run = async {
            let total: i64 = count_query.fetch_one(&self.pool).await?.try_get("total")?;
            let entries = select_query.fetch_all(&self.pool).await?;
            Ok::<_, AuditError>((entries, total))
        };
        let (entries, total) = tokio::time::timeout(timeout, run)
            .await
            .map_err(|_| AuditError::StoreTimeout)??;

        Ok(LogPage {
            entries,
            pagination: Pagination { page, per_page, total },
        })
    }

    /// Export the filtered set as CSV (same filters and ordering as
    /// `query`; pagination still applies so exports stay bounded).
    pub async fn export_csv(&self, query: &LogQuery) -> Result<String, AuditError> {
        let page = self.query(query).await?;

        let mut out = String::from("id,timestamp,admin,action,details\n");
        for entry in &page.entries {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                entry.id,
                entry.timestamp.to_rfc3339(),
                csv_escape(&entry.admin),
                csv_escape(&entry.action),
                csv_escape(&entry.details),
            ));
        }
        Ok(out)
    }
}

/// Validate and normalize recorder inputs: empty fields skip the write,
/// oversized fields are truncated, client context is appended to details.
fn clean_inputs(
    admin: &str,
    action: &str,
    details: &str,
    meta: Option<&RequestMeta>,
) -> Option<(String, String, String)> {
    let audit_config = &config::config().audit;

    let admin = admin.trim();
    if admin.is_empty() {
        tracing::warn!("Audit logging skipped: empty admin identifier");
        return None;
    }
    let action = action.trim();
    if action.is_empty() {
        tracing::warn!("Audit logging skipped: empty action");
        return None;
    }
    let details = details.trim();
    if details.is_empty() {
        tracing::warn!("Audit logging skipped: empty details");
        return None;
    }

    let admin = truncate_chars(admin, audit_config.max_admin_len);
    let action = truncate_chars(action, audit_config.max_action_len);
    let mut details = details.to_string();

    if let Some(meta) = meta {
        let ip = meta.ip.as_deref().unwrap_or("unknown");
        let user_agent = truncate_chars(meta.user_agent.as_deref().unwrap_or("unknown"), 100);
        details.push_str(&format!(" | ip={} ua={}", ip, user_agent));
    }

    if details.chars().count() > audit_config.max_details_len {
        details = truncate_chars(&details, audit_config.max_details_len - 3);
        details.push_str("...");
    }

    Some((admin, action, details))
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// `timestamp` sorts ascending, `-timestamp` descending (the default).
/// Unknown keys are rejected rather than silently coerced.
fn parse_sort(sort: Option<&str>) -> Result<SortDirection, AuditError> {
    match sort {
        None | Some("-timestamp") => Ok(SortDirection::Desc),
        Some("timestamp") => Ok(SortDirection::Asc),
        Some(other) => Err(AuditError::InvalidSortKey(other.to_string())),
    }
}

/// Build the WHERE clause with numbered placeholders; returns the SQL
/// fragment and the bind values in order.
fn build_where(query: &LogQuery) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(admin) = query.admin.as_deref().filter(|s| !s.is_empty()) {
        params.push(admin.to_string());
        clauses.push(format!("admin = ${}", params.len()));
    }
    if let Some(action) = query.action.as_deref().filter(|s| !s.is_empty()) {
        params.push(action.to_string());
        clauses.push(format!("action = ${}", params.len()));
    }
    if let Some(needle) = query.q.as_deref().filter(|s| !s.is_empty()) {
        params.push(format!("%{}%", escape_like(needle)));
        clauses.push(format!("details ILIKE ${}", params.len()));
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn csv_escape(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
