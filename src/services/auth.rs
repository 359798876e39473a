use serde::{Deserialize, Serialize};

/// Role granted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" | "ROLE_ADMIN" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Identity of the caller, resolved by the gateway and passed explicitly
/// into every service operation. The core trusts it as already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i64,
    pub roles: Vec<Role>,
}

impl AuthContext {
    pub fn new(user_id: i64, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    /// Context for a regular user.
    pub fn user(user_id: i64) -> Self {
        Self::new(user_id, vec![Role::User])
    }

    /// Context for an administrator.
    pub fn admin(user_id: i64) -> Self {
        Self::new(user_id, vec![Role::Admin])
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
