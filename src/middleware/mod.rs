use axum::{
    extract::Request,
    middleware::{from_fn, Next},
    Router,
};

pub mod auth;
pub mod cors;
pub mod response;

pub use auth::AuthUser;
pub use response::{ApiResponse, ApiResult};

use crate::auth::Role;

/// The only way a router becomes protected. Layers execute outermost
/// first, and axum applies them innermost-first, so the order here pins
/// the pipeline: CORS decoration -> preflight short-circuit -> token
/// verification + role gate -> handler.
pub fn protect(router: Router, allowed: &'static [Role]) -> Router {
    router
        .layer(from_fn(move |request: Request, next: Next| {
            auth::require_role(allowed, request, next)
        }))
        .layer(from_fn(cors::preflight))
        .layer(cors::cors_layer())
}
