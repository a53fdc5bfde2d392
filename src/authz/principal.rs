use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

/// Caller identity for one request.
///
/// Built fresh from the session on every request and carried in the request
/// extensions; nothing here is shared between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: Option<SessionUser>,
    pub role: Role,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            user: None,
            role: Role::DEFAULT,
        }
    }

    pub fn authenticated(user: SessionUser, role: Role) -> Self {
        Self {
            user: Some(user),
            role,
        }
    }

    pub fn from_claim(user: Option<SessionUser>, role_claim: Option<&Value>) -> Self {
        Self {
            user,
            role: Role::parse_claim(role_claim),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stale_claim_keeps_user_but_defaults_role() {
        let user = SessionUser {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
        };
        let identity = Identity::from_claim(Some(user.clone()), Some(&json!("superuser")));

        assert!(identity.is_authenticated());
        assert_eq!(identity.user, Some(user));
        assert_eq!(identity.role, Role::DEFAULT);
    }

    #[test]
    fn anonymous_has_no_user() {
        let identity = Identity::default();
        assert!(!identity.is_authenticated());
        assert_eq!(identity.user, None);
    }
}
