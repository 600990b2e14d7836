//! Caller identity
//!
//! Every mutating operation receives the authenticated [`Caller`] explicitly.
//! Verifying the bearer credential is delegated to an [`IdentityVerifier`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Marketplace role carried in the credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tourist,
    Owner,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tourist => "tourist",
            Self::Owner => "owner",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tourist" => Ok(Self::Tourist),
            "owner" => Ok(Self::Owner),
            "administrator" => Ok(Self::Administrator),
            other => Err(DomainError::Unauthorized(format!("unknown role '{}'", other))),
        }
    }
}

/// The authenticated user behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn tourist(id: impl Into<String>) -> Self {
        Self::new(id, Role::Tourist)
    }

    pub fn owner(id: impl Into<String>) -> Self {
        Self::new(id, Role::Owner)
    }

    pub fn administrator(id: impl Into<String>) -> Self {
        Self::new(id, Role::Administrator)
    }

    /// Fail with `Forbidden` unless the caller has `role`.
    pub fn require_role(&self, role: Role, action: &str) -> DomainResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "only a {} may {}",
                role, action
            )))
        }
    }
}

/// Turns a bearer credential into a [`Caller`].
pub trait IdentityVerifier: Send + Sync {
    /// Fails with `DomainError::Unauthorized` for missing, malformed or expired credentials.
    fn verify(&self, credential: &str) -> DomainResult<Caller>;
}
