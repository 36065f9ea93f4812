use super::{AuthError, Role};

/// Per-route role check. A route declares its acceptable roles; any match
/// allows, there is no priority ordering between them.
pub fn check_role(actual: Role, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.contains(&actual) {
        return Ok(());
    }
    Err(AuthError::ForbiddenRole(denial_message(actual, allowed)))
}

/// Canonical denial message, naming the required role set and the caller's
/// own role. Kept in Portuguese for the marketplace frontends.
fn denial_message(actual: Role, allowed: &[Role]) -> String {
    let required = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(" ou ");
    format!(
        "Acesso não autorizado: apenas usuários do tipo {} podem aceder a esta rota (tipo atual: {}).",
        required, actual
    )
}
