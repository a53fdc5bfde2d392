use std::collections::{HashMap, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

use super::path::{is_registry_path, is_under, normalize_path};
use crate::authz::{Role, RoleRelation};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NavIcon {
    Home,
    Users,
    Link,
    Wallet,
    Calendar,
    Stethoscope,
    BarChart,
    FileText,
    LifeBuoy,
    Shield,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavRoute {
    pub href: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<NavIcon>,
}

impl NavRoute {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: NavIcon) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Role-scoped application area owning every path under `base_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub base_path: String,
    pub label: String,
    pub requirement: Role,
    pub nav: Vec<NavRoute>,
}

impl Dashboard {
    pub fn new(base_path: impl Into<String>, label: impl Into<String>, requirement: Role) -> Self {
        Self {
            base_path: base_path.into(),
            label: label.into(),
            requirement,
            nav: Vec::new(),
        }
    }

    pub fn route(mut self, route: NavRoute) -> Self {
        self.nav.push(route);
        self
    }

    pub fn owns(&self, path: &str) -> bool {
        is_under(&normalize_path(path), &self.base_path)
    }

    /// Most specific sidebar entry covering `path`.
    pub fn active_nav(&self, path: &str) -> Option<&NavRoute> {
        let path = normalize_path(path);
        self.nav
            .iter()
            .filter(|route| is_under(&path, &normalize_path(&route.href)))
            .max_by_key(|route| normalize_path(&route.href).len())
    }
}

/// Static dashboard table plus the per-role landing pages.
///
/// Validated once in [`RouteRegistry::new`]; read-only afterwards.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    dashboards: Vec<Dashboard>,
    defaults: HashMap<Role, String>,
    relation: RoleRelation,
}

impl RouteRegistry {
    pub fn new(
        dashboards: Vec<Dashboard>,
        defaults: impl IntoIterator<Item = (Role, String)>,
        relation: RoleRelation,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for dashboard in &dashboards {
            if !is_registry_path(&dashboard.base_path) {
                return Err(ConfigError::InvalidPath(dashboard.base_path.clone()));
            }
            if !seen.insert(dashboard.base_path.as_str()) {
                return Err(ConfigError::DuplicateDashboard(dashboard.base_path.clone()));
            }
            if let Some(route) = dashboard
                .nav
                .iter()
                .find(|route| !is_under(&normalize_path(&route.href), &dashboard.base_path))
            {
                return Err(ConfigError::NavOutsideDashboard {
                    base_path: dashboard.base_path.clone(),
                    href: route.href.clone(),
                });
            }
        }

        let registry = Self {
            dashboards,
            defaults: defaults.into_iter().collect(),
            relation,
        };

        for role in Role::ALL {
            let path = registry
                .defaults
                .get(&role)
                .ok_or(ConfigError::MissingDefault(role))?;
            let reachable = registry
                .find_matching_dashboard(path)
                .is_some_and(|dashboard| registry.has_role_access(role, dashboard.requirement));
            if !reachable {
                return Err(ConfigError::UnreachableDefault {
                    role,
                    path: path.clone(),
                });
            }
        }

        Ok(registry)
    }

    pub fn dashboards(&self) -> &[Dashboard] {
        &self.dashboards
    }

    /// Longest base path owning `path`, or `None` for public pages.
    pub fn find_matching_dashboard(&self, path: &str) -> Option<&Dashboard> {
        self.dashboards
            .iter()
            .filter(|dashboard| dashboard.owns(path))
            .max_by_key(|dashboard| dashboard.base_path.len())
    }

    pub fn has_role_access(&self, role: Role, requirement: Role) -> bool {
        self.relation.satisfies(role, requirement)
    }

    pub fn default_dashboard(&self, role: Role) -> &str {
        // every role is checked in `new`
        self.defaults.get(&role).map(String::as_str).unwrap_or("/")
    }
}
