use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::app::AppState;
use crate::authz::{Identity, Role, SessionUser};
use crate::identity::CurrentIdentity;
use crate::routing::{Dashboard, NavRoute};

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
    pub role: Option<Role>,
    pub role_label: Option<String>,
    /// Landing dashboard for the caller's role.
    pub home: Option<String>,
}

/// Sidebar model for one dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NavigationView {
    pub base_path: String,
    pub label: String,
    pub requirement: Role,
    pub active: Option<NavRoute>,
    pub nav: Vec<NavRoute>,
}

impl NavigationView {
    pub fn for_path(dashboard: &Dashboard, path: &str) -> Self {
        Self {
            base_path: dashboard.base_path.clone(),
            label: dashboard.label.clone(),
            requirement: dashboard.requirement,
            active: dashboard.active_nav(path).cloned(),
            nav: dashboard.nav.clone(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NavigationQuery {
    /// Path whose dashboard should be described.
    pub path: String,
}

#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Session",
    responses((status = 200, description = "Current caller", body = MeResponse))
)]
pub async fn me(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> Json<MeResponse> {
    Json(me_response(&state, identity))
}

fn me_response(state: &AppState, identity: Identity) -> MeResponse {
    if !identity.is_authenticated() {
        return MeResponse {
            authenticated: false,
            user: None,
            role: None,
            role_label: None,
            home: None,
        };
    }

    MeResponse {
        authenticated: true,
        role: Some(identity.role),
        role_label: Some(identity.role.label().to_string()),
        home: Some(state.gate.default_dashboard(identity.role).to_string()),
        user: identity.user,
    }
}

/// Dashboard and sidebar for `path`, or `null` when the caller may not see it.
#[utoipa::path(
    get,
    path = "/api/navigation",
    tag = "Session",
    params(NavigationQuery),
    responses((status = 200, description = "Navigation for the path", body = NavigationView))
)]
pub async fn navigation(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Query(query): Query<NavigationQuery>,
) -> Json<Option<NavigationView>> {
    let view = state
        .gate
        .get_current_dashboard(&query.path)
        .filter(|dashboard| {
            identity.is_authenticated() && state.gate.has_role_access(identity.role, dashboard.requirement)
        })
        .map(|dashboard| NavigationView::for_path(dashboard, &query.path));

    Json(view)
}
