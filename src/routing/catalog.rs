//! Product route tables: dashboards, landing pages, retired URLs and auth pages.
//!
//! Adding an audience means adding a [`Role`] variant and its rows here.

use super::auth_paths::AuthPaths;
use super::legacy::{LegacyRedirect, LegacyRedirectMap};
use super::registry::{Dashboard, NavIcon, NavRoute, RouteRegistry};
use crate::authz::{Role, RoleRelation};
use crate::errors::ConfigError;

pub const DEFAULT_DASHBOARDS: [(Role, &str); 5] = [
    (Role::Affiliate, "/affiliates"),
    (Role::Clinic, "/clinic"),
    (Role::Finance, "/finance"),
    (Role::Support, "/support"),
    (Role::Admin, "/admin"),
];

pub const LEGACY_REDIRECTS: [(&str, &str); 7] = [
    ("/dashboard", "/affiliates"),
    ("/affiliate", "/affiliates"),
    ("/partners", "/affiliates"),
    ("/professional", "/clinic"),
    ("/professionals/dashboard", "/clinic"),
    ("/finance-dashboard", "/finance"),
    ("/admin-panel", "/admin"),
];

pub const LOGIN_PATH: &str = "/auth/login";

pub const AUTH_PAGES: [&str; 3] = [LOGIN_PATH, "/auth/sign-up", "/auth/forgot-password"];

/// Flow pages that must work whatever the session state.
pub const ALWAYS_REACHABLE: [&str; 4] = [
    "/auth/callback",
    "/auth/confirm",
    "/auth/update-password",
    "/auth/error",
];

pub fn dashboards() -> Vec<Dashboard> {
    vec![
        Dashboard::new("/affiliates", "Affiliate Dashboard", Role::Affiliate)
            .route(NavRoute::new("/affiliates", "Overview").with_icon(NavIcon::Home))
            .route(NavRoute::new("/affiliates/referrals", "Referrals").with_icon(NavIcon::Link))
            .route(NavRoute::new("/affiliates/commissions", "Commissions").with_icon(NavIcon::Wallet))
            .route(NavRoute::new("/affiliates/settings", "Settings").with_icon(NavIcon::Settings)),
        Dashboard::new("/clinic", "Clinic Dashboard", Role::Clinic)
            .route(NavRoute::new("/clinic", "Overview").with_icon(NavIcon::Home))
            .route(NavRoute::new("/clinic/appointments", "Appointments").with_icon(NavIcon::Calendar))
            .route(NavRoute::new("/clinic/patients", "Patients").with_icon(NavIcon::Stethoscope))
            .route(NavRoute::new("/clinic/referrals", "Referrals").with_icon(NavIcon::Link))
            .route(NavRoute::new("/clinic/settings", "Settings").with_icon(NavIcon::Settings)),
        Dashboard::new("/finance", "Finance Dashboard", Role::Finance)
            .route(NavRoute::new("/finance", "Overview").with_icon(NavIcon::Home))
            .route(NavRoute::new("/finance/payouts", "Payouts").with_icon(NavIcon::Wallet))
            .route(NavRoute::new("/finance/commissions", "Commissions").with_icon(NavIcon::FileText))
            .route(NavRoute::new("/finance/reports", "Reports").with_icon(NavIcon::BarChart)),
        Dashboard::new("/support", "Support Dashboard", Role::Support)
            .route(NavRoute::new("/support", "Overview").with_icon(NavIcon::Home))
            .route(NavRoute::new("/support/tickets", "Tickets").with_icon(NavIcon::LifeBuoy))
            .route(NavRoute::new("/support/users", "Users").with_icon(NavIcon::Users)),
        Dashboard::new("/admin", "Admin Dashboard", Role::Admin)
            .route(NavRoute::new("/admin", "Overview").with_icon(NavIcon::Home))
            .route(NavRoute::new("/admin/users", "Users").with_icon(NavIcon::Users))
            .route(NavRoute::new("/admin/clinics", "Clinics").with_icon(NavIcon::Stethoscope))
            .route(NavRoute::new("/admin/analytics", "Analytics").with_icon(NavIcon::BarChart))
            .route(NavRoute::new("/admin/security", "Security").with_icon(NavIcon::Shield)),
    ]
}

pub fn route_registry() -> Result<RouteRegistry, ConfigError> {
    RouteRegistry::new(
        dashboards(),
        DEFAULT_DASHBOARDS
            .into_iter()
            .map(|(role, path)| (role, path.to_string())),
        RoleRelation::standard(),
    )
}

pub fn legacy_redirects(registry: &RouteRegistry) -> Result<LegacyRedirectMap, ConfigError> {
    LegacyRedirectMap::new(
        LEGACY_REDIRECTS
            .into_iter()
            .map(|(from, to)| LegacyRedirect::new(from, to)),
        registry,
    )
}

pub fn auth_paths() -> AuthPaths {
    AuthPaths::new(LOGIN_PATH, AUTH_PAGES, ALWAYS_REACHABLE)
}
