use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::decision::Decision;
use crate::app::AppState;

/// Edge check run on every request before routing.
///
/// Legacy URLs are redirected before the identity lookup. Otherwise the
/// identity is resolved once, the decision applied, and the identity stored
/// in the request extensions for handlers and layout checks.
pub async fn access_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if let Some(decision) = state.gate.legacy_decision(&path_and_query) {
        tracing::info!(path = %path_and_query, location = decision.location().unwrap_or(""), "legacy redirect");
        return redirect_response(&decision);
    }

    let identity = state.resolve_identity(request.headers()).await;

    match state.gate.decide(&path_and_query, &identity) {
        Decision::Continue(_) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        decision => redirect_response(&decision),
    }
}

/// Temporary redirect for a denied decision.
pub fn redirect_response(decision: &Decision) -> Response {
    match decision.location() {
        Some(location) => Redirect::temporary(location).into_response(),
        None => {
            tracing::error!(state = ?decision.state(), "redirect requested without a location");
            Redirect::temporary("/").into_response()
        }
    }
}
