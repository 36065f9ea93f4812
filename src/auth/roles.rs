use serde::{Deserialize, Serialize};

/// User roles of the delivery marketplace, mirroring the `user_type`
/// metadata set by the identity provider at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordering customer
    Client,
    /// Restaurant operator
    Restaurant,
    /// Courier
    Delivery,
    /// Platform administrator
    Admin,
}

impl Role {
    /// Every role the platform knows about; routes that only need an
    /// authenticated caller declare this set.
    pub const ALL: &'static [Role] = &[Role::Client, Role::Restaurant, Role::Delivery, Role::Admin];

    /// Parse role from string (case-insensitive), as stored in the token's
    /// `user_type` claim.
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "client" => Some(Role::Client),
            "restaurant" => Some(Role::Restaurant),
            "delivery" => Some(Role::Delivery),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Restaurant => "restaurant",
            Role::Delivery => "delivery",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
