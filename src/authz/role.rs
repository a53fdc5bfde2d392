use std::fmt;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Audience a signed-in user belongs to.
///
/// The set is closed: role claims coming from the identity provider are
/// normalized through [`Role::parse_claim`], which never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Affiliate,
    Clinic,
    Finance,
    Support,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Affiliate,
        Role::Clinic,
        Role::Finance,
        Role::Support,
        Role::Admin,
    ];

    /// Role assumed when a claim is missing, stale or malformed.
    pub const DEFAULT: Role = Role::Affiliate;

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Affiliate => "affiliate",
            Role::Clinic => "clinic",
            Role::Finance => "finance",
            Role::Support => "support",
            Role::Admin => "admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Affiliate => "Affiliate",
            Role::Clinic => "Clinic Professional",
            Role::Finance => "Finance",
            Role::Support => "Support",
            Role::Admin => "Administrator",
        }
    }

    /// Exact, case-sensitive token match.
    pub fn from_token(token: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|role| role.as_str() == token)
    }

    pub fn parse_claim(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::String(token)) => Role::from_token(token).unwrap_or_else(|| {
                tracing::debug!(claim = %token, "unknown role claim, using default role");
                Role::DEFAULT
            }),
            _ => Role::DEFAULT,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn parse_role(raw: &Value) -> Role {
    Role::parse_claim(Some(raw))
}
