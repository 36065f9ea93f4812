// handlers/elevated/logs/list.rs - GET /api/audit handler (alias: /api/logs)

use axum::extract::Query;
use axum::http::HeaderMap;
use axum::Extension;

use super::{request_meta, LogListParams};
use crate::database::models::AdminLogEntry;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::audit_service::AuditService;

/// Paginated, filtered listing of the admin action log. Reading the log is
/// itself an admin action and is recorded best-effort.
pub async fn logs_list(
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Query(params): Query<LogListParams>,
) -> ApiResult<Vec<AdminLogEntry>> {
    let service = AuditService::new()?;
    let page = service.query(&params.into_query()).await?;

    AuditService::record_best_effort(
        user.email,
        "ViewLogs",
        format!(
            "Consultou os logs administrativos (página {}, {} por página)",
            page.pagination.page, page.pagination.per_page
        ),
        Some(request_meta(&headers)),
    );

    Ok(ApiResponse::paginated(page.entries, page.pagination))
}
