use axum::http::HeaderMap;
use jsonwebtoken::{decode, DecodingKey, Validation};

use super::{AuthError, Claims};
use crate::config;

/// Extract the bearer token from the Authorization header.
///
/// Preflight requests never reach this point; the CORS interceptor answers
/// them before the auth middleware runs.
pub fn bearer_from_headers(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedToken)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedToken)?;

    if token.trim().is_empty() {
        return Err(AuthError::MalformedToken);
    }
    Ok(token.trim().to_string())
}

/// Validate a token against the configured secret and extract its claims.
/// Pure verification: no I/O, no side effects.
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }
    verify_with_secret(token, secret)
}

fn verify_with_secret(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken,
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn token_with(secret: &str, exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "courier@inksadelivery.com.br".into(),
            user_type: Role::Delivery,
            exp: now + exp_offset_secs,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn missing_header_is_missing_token() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_from_headers(&headers), Err(AuthError::MissingToken));
    }

    #[test]
    fn non_bearer_scheme_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_from_headers(&headers), Err(AuthError::MalformedToken));
    }

    #[test]
    fn empty_bearer_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_from_headers(&headers), Err(AuthError::MalformedToken));
    }

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_from_headers(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn valid_token_round_trips() {
        let token = token_with(SECRET, 3600);
        let claims = verify_with_secret(&token, SECRET).unwrap();
        assert_eq!(claims.user_type, Role::Delivery);
        assert_eq!(claims.email, "courier@inksadelivery.com.br");
    }

    #[test]
    fn wrong_key_is_invalid_signature() {
        let token = token_with("some-other-secret", 3600);
        assert_eq!(
            verify_with_secret(&token, SECRET),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn expired_token_is_expired() {
        let token = token_with(SECRET, -3600);
        assert_eq!(verify_with_secret(&token, SECRET), Err(AuthError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            verify_with_secret("not-a-jwt", SECRET),
            Err(AuthError::MalformedToken)
        );
    }
}
