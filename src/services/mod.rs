pub mod audit_service;

pub use audit_service::{AuditService, LogPage, LogQuery, Pagination, RequestMeta};
