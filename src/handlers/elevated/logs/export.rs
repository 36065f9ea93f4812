// handlers/elevated/logs/export.rs - GET /api/audit/export handler

use axum::extract::Query;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Extension;

use super::{request_meta, LogListParams};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::audit_service::AuditService;

/// CSV export of the filtered log set, same filters and ordering as the
/// listing route.
pub async fn logs_export(
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Query(params): Query<LogListParams>,
) -> Result<Response, ApiError> {
    let service = AuditService::new()?;
    let csv = service.export_csv(&params.into_query()).await?;

    AuditService::record_best_effort(
        user.email,
        "ExportLogs",
        "Exportou os logs administrativos em CSV".to_string(),
        Some(request_meta(&headers)),
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"admin_logs.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
