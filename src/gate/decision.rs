use std::sync::Arc;

use serde::Serialize;

use super::next::is_safe_next;
use crate::authz::{Identity, Role};
use crate::errors::ConfigError;
use crate::routing::path::{is_under, normalize_path, query_param, split_query};
use crate::routing::{catalog, AuthPaths, Dashboard, LegacyRedirectMap, RouteRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    LegacyRedirect,
    Public,
    UnauthenticatedProtected,
    AuthenticatedAuthorized,
    AuthenticatedUnauthorized,
    AuthPageWhileLoggedIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue(AccessState),
    Redirect { state: AccessState, location: String },
}

impl Decision {
    pub fn state(&self) -> AccessState {
        match self {
            Decision::Continue(state) => *state,
            Decision::Redirect { state, .. } => *state,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Decision::Continue(_) => None,
            Decision::Redirect { location, .. } => Some(location),
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Decision::Continue(_))
    }
}

/// Request-time access policy.
///
/// Holds the read-only route tables; cloning is cheap and every clone sees
/// the same tables.
#[derive(Debug, Clone)]
pub struct AccessGate {
    registry: Arc<RouteRegistry>,
    legacy: Arc<LegacyRedirectMap>,
    auth: Arc<AuthPaths>,
}

impl AccessGate {
    pub fn new(
        registry: RouteRegistry,
        legacy: LegacyRedirectMap,
        auth: AuthPaths,
    ) -> Result<Self, ConfigError> {
        if !auth.is_auth_page(auth.login()) {
            return Err(ConfigError::LoginNotAuthPage(auth.login().to_string()));
        }

        let auth_owned = auth.pages().iter().chain(auth.always_reachable());
        for path in auth_owned {
            if let Some(dashboard) = registry.find_matching_dashboard(path) {
                return Err(ConfigError::AuthPathInsideDashboard {
                    path: path.clone(),
                    base_path: dashboard.base_path.clone(),
                });
            }
            // legacy redirects run first, so a captured auth path could never be served
            if let Some(entry) = legacy
                .entries()
                .iter()
                .find(|entry| is_under(path, &entry.from) || is_under(&entry.from, path))
            {
                return Err(ConfigError::LegacyCapturesAuthPath {
                    from: entry.from.clone(),
                    path: path.clone(),
                });
            }
        }

        Ok(Self {
            registry: Arc::new(registry),
            legacy: Arc::new(legacy),
            auth: Arc::new(auth),
        })
    }

    /// Gate over the product route tables.
    pub fn standard() -> Result<Self, ConfigError> {
        let registry = catalog::route_registry()?;
        let legacy = catalog::legacy_redirects(&registry)?;
        Self::new(registry, legacy, catalog::auth_paths())
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn legacy(&self) -> &LegacyRedirectMap {
        &self.legacy
    }

    pub fn auth_paths(&self) -> &AuthPaths {
        &self.auth
    }

    pub fn get_current_dashboard(&self, path: &str) -> Option<&Dashboard> {
        self.registry.find_matching_dashboard(path)
    }

    pub fn has_role_access(&self, role: Role, requirement: Role) -> bool {
        self.registry.has_role_access(role, requirement)
    }

    pub fn default_dashboard(&self, role: Role) -> &str {
        self.registry.default_dashboard(role)
    }

    /// `next` if it is a safe, non-auth destination; the role's home otherwise.
    pub fn post_login_destination(&self, next: Option<&str>, role: Role) -> String {
        match next {
            Some(next) if self.is_honored_next(next) => match self.legacy.find_legacy_redirect(next) {
                Some(current) => {
                    tracing::debug!(next = %next, location = %current, "next points at a retired url");
                    current
                }
                None => next.to_string(),
            },
            Some(next) => {
                tracing::debug!(next = %next, "ignoring unsafe next parameter");
                self.default_dashboard(role).to_string()
            }
            None => self.default_dashboard(role).to_string(),
        }
    }

    pub fn is_honored_next(&self, next: &str) -> bool {
        is_safe_next(next) && !self.auth.is_auth_page(next)
    }

    /// Legacy short-circuit, checked before any identity is needed.
    pub fn legacy_decision(&self, path_and_query: &str) -> Option<Decision> {
        self.legacy
            .find_legacy_redirect(path_and_query)
            .map(|location| Decision::Redirect {
                state: AccessState::LegacyRedirect,
                location,
            })
    }

    pub fn decide(&self, path_and_query: &str, identity: &Identity) -> Decision {
        let decision = self.evaluate(path_and_query, identity);
        tracing::debug!(
            path = %path_and_query,
            role = %identity.role,
            authenticated = identity.is_authenticated(),
            state = ?decision.state(),
            location = decision.location().unwrap_or(""),
            "access decision"
        );
        decision
    }

    fn evaluate(&self, path_and_query: &str, identity: &Identity) -> Decision {
        if let Some(decision) = self.legacy_decision(path_and_query) {
            return decision;
        }

        let (raw_path, query) = split_query(path_and_query);
        let path = normalize_path(raw_path);

        if self.auth.is_auth_page(&path) {
            if !identity.is_authenticated() {
                return Decision::Continue(AccessState::Public);
            }
            let next = query.and_then(|query| query_param(query, "next"));
            return Decision::Redirect {
                state: AccessState::AuthPageWhileLoggedIn,
                location: self.post_login_destination(next.as_deref(), identity.role),
            };
        }

        let Some(dashboard) = self.registry.find_matching_dashboard(&path) else {
            return Decision::Continue(AccessState::Public);
        };

        self.dashboard_verdict(dashboard, path_and_query, identity)
    }

    /// Verdict for a request already known to belong to `dashboard`.
    pub(crate) fn dashboard_verdict(
        &self,
        dashboard: &Dashboard,
        path_and_query: &str,
        identity: &Identity,
    ) -> Decision {
        if !identity.is_authenticated() {
            let (raw_path, query) = split_query(path_and_query);
            let requested = match query.filter(|query| !query.is_empty()) {
                Some(query) => format!("{raw_path}?{query}"),
                None => raw_path.to_string(),
            };
            return Decision::Redirect {
                state: AccessState::UnauthenticatedProtected,
                location: self.auth.login_redirect(&requested),
            };
        }

        if !self.has_role_access(identity.role, dashboard.requirement) {
            return Decision::Redirect {
                state: AccessState::AuthenticatedUnauthorized,
                location: self.default_dashboard(identity.role).to_string(),
            };
        }

        Decision::Continue(AccessState::AuthenticatedAuthorized)
    }
}
