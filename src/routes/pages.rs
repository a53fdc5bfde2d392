use axum::http::Uri;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::errors::AppError;
use crate::identity::CurrentIdentity;

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub page: String,
    pub authenticated: bool,
    /// Dashboard link shown in the header for signed-in visitors.
    pub dashboard: Option<String>,
}

pub async fn home(State(state): State<AppState>, CurrentIdentity(identity): CurrentIdentity) -> Json<HomePage> {
    let dashboard = identity
        .is_authenticated()
        .then(|| state.gate.default_dashboard(identity.role).to_string());

    Json(HomePage {
        page: "home".to_string(),
        authenticated: identity.is_authenticated(),
        dashboard,
    })
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("no page at {}", uri.path()))
}
