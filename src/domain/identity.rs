use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Shopper,
    Merchant,
    Admin,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shopper" => Ok(Role::Shopper),
            "merchant" => Ok(Role::Merchant),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::InvalidInput(format!("unknown role '{other}'"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Shopper => "shopper",
            Role::Merchant => "merchant",
            Role::Admin => "admin",
        })
    }
}

/// The authenticated account behind a request, resolved once at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn shopper(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Shopper,
        }
    }

    /// Merchant screens are open to merchants and admins only.
    pub fn require_staff(&self) -> Result<(), DomainError> {
        match self.role {
            Role::Merchant | Role::Admin => Ok(()),
            Role::Shopper => Err(DomainError::Unauthorized),
        }
    }
}
