use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PortalError;

/// Session context for the signed-in user, handed to the gateway when it is
/// constructed. Business logic never reads authentication state from ambient
/// storage; everything it knows about the acting user comes from this object.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub bearer_token: String,
    pub user_id: Option<Uuid>,
    pub role: UserRole,
}

impl AuthSession {
    pub fn new(bearer_token: impl Into<String>, user_id: Option<Uuid>, role: UserRole) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            user_id,
            role,
        }
    }

    /// Resolve the acting patient's identity. Booking fails fast on a
    /// missing identity, before any network call is made.
    pub fn resolve_patient(&self) -> Result<Uuid, PortalError> {
        self.user_id.ok_or(PortalError::IdentityUnresolved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Patient,
    Doctor,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Patient => write!(f, "patient"),
            UserRole::Doctor => write!(f, "doctor"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = PortalError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(UserRole::Patient),
            "doctor" => Ok(UserRole::Doctor),
            "admin" => Ok(UserRole::Admin),
            _ => Err(PortalError::ValidationError(format!(
                "unknown role: {raw}"
            ))),
        }
    }
}
