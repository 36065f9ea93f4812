use axum::http::{header, HeaderMap};
use serde::Deserialize;

use crate::services::audit_service::{LogQuery, RequestMeta};

pub mod export;
pub mod health;
pub mod list;

pub use export::logs_export;
pub use health::audit_health;
pub use list::logs_list;

/// Query parameters of the audit listing routes.
#[derive(Debug, Default, Deserialize)]
pub struct LogListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Alias for `limit`, kept for older admin frontends
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub admin: Option<String>,
    pub action: Option<String>,
    pub q: Option<String>,
}

impl LogListParams {
    pub fn into_query(self) -> LogQuery {
        LogQuery {
            page: self.page,
            limit: self.limit.or(self.per_page),
            sort: self.sort,
            admin: self.admin,
            action: self.action,
            q: self.q,
        }
    }
}

/// Client context for audit enrichment: first hop of X-Forwarded-For
/// (the service runs behind a proxy) and the User-Agent header.
pub(crate) fn request_meta(headers: &HeaderMap) -> RequestMeta {
    RequestMeta {
        ip: headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string()),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn per_page_is_an_alias_for_limit() {
        let params = LogListParams {
            per_page: Some(25),
            ..Default::default()
        };
        assert_eq!(params.into_query().limit, Some(25));

        // explicit limit wins over the alias
        let params = LogListParams {
            limit: Some(10),
            per_page: Some(25),
            ..Default::default()
        };
        assert_eq!(params.into_query().limit, Some(10));
    }

    #[test]
    fn request_meta_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

        let meta = request_meta(&headers);
        assert_eq!(meta.ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(meta.user_agent.as_deref(), Some("Mozilla/5.0"));
    }
}
