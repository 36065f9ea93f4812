use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{gate, verifier, Claims, Role};
use crate::error::ApiError;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub user_type: Role,
    /// Raw claims, kept for session binding against the data store
    pub claims: Claims,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
            user_type: claims.user_type,
            claims,
        }
    }
}

/// Verify the bearer token, run the role gate against the route's declared
/// role set, and inject the caller identity into the request. Preflight
/// requests never reach this function; `middleware::protect` places the
/// CORS interceptor in front of it.
pub async fn require_role(
    allowed: &'static [Role],
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = verifier::bearer_from_headers(request.headers())?;
    let claims = verifier::verify_token(&token)?;
    gate::check_role(claims.user_type, allowed)?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}
