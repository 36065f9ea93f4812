use thiserror::Error;

/// Failures produced by token verification and the role gate.
///
/// User-facing messages stay in Portuguese to match what the marketplace
/// frontends already display; internal variants log in English.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token de autenticação está em falta")]
    MissingToken,

    #[error("Token de autenticação malformado")]
    MalformedToken,

    #[error("Assinatura do token inválida")]
    InvalidSignature,

    #[error("Token expirado")]
    Expired,

    /// Carries the full denial message built by the role gate.
    #[error("{0}")]
    ForbiddenRole(String),

    #[error("JWT secret not configured")]
    SecretNotConfigured,
}
