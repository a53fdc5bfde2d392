use axum::http::Uri;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::authz::{Role, SessionUser};
use crate::gate::AreaAccess;
use crate::routes::session::NavigationView;

/// Server-rendered shell for a dashboard area: sidebar plus the signed-in user.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardView {
    pub path: String,
    pub dashboard: NavigationView,
    pub user: Option<SessionUser>,
    pub role: Role,
    pub role_label: String,
}

pub async fn show(area: AreaAccess, uri: Uri) -> Json<DashboardView> {
    let AreaAccess { dashboard, identity } = area;

    Json(DashboardView {
        path: uri.path().to_string(),
        dashboard: NavigationView::for_path(&dashboard, uri.path()),
        role: identity.role,
        role_label: identity.role.label().to_string(),
        user: identity.user,
    })
}
