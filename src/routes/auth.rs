use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::app::AppState;
use crate::identity::CurrentIdentity;
use crate::routing::path::with_query_param;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthPageQuery {
    /// Same-origin path to continue to after signing in.
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ErrorQuery {
    pub reason: Option<String>,
}

/// Descriptor for an auth page; the form itself lives in the frontend.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPage {
    pub page: String,
    /// Sanitized return path, absent when missing or unsafe.
    pub next: Option<String>,
}

fn auth_page(state: &AppState, page: &str, query: AuthPageQuery) -> Json<AuthPage> {
    let next = query.next.filter(|next| state.gate.is_honored_next(next));
    Json(AuthPage {
        page: page.to_string(),
        next,
    })
}

#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "Auth",
    params(AuthPageQuery),
    responses(
        (status = 200, description = "Login page", body = AuthPage),
        (status = 307, description = "Already signed in")
    )
)]
pub async fn login_page(State(state): State<AppState>, Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    auth_page(&state, "login", query)
}

pub async fn sign_up_page(State(state): State<AppState>, Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    auth_page(&state, "sign-up", query)
}

pub async fn forgot_password_page(State(state): State<AppState>, Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    auth_page(&state, "forgot-password", query)
}

pub async fn update_password_page(State(state): State<AppState>, Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    auth_page(&state, "update-password", query)
}

/// Landing point after the identity provider completes a sign-in or an
/// email confirmation. Reachable in every session state.
#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = "Auth",
    params(AuthPageQuery),
    responses((status = 307, description = "Redirect to `next`, the caller's dashboard, or the error page"))
)]
pub async fn callback(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Query(query): Query<AuthPageQuery>,
) -> Redirect {
    if !identity.is_authenticated() {
        tracing::info!("auth callback without a session");
        return Redirect::temporary(&with_query_param("/auth/error", "reason", "missing_session"));
    }

    let destination = state.gate.post_login_destination(query.next.as_deref(), identity.role);
    Redirect::temporary(&destination)
}

pub async fn error_page(Query(query): Query<ErrorQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "page": "error",
        "reason": query.reason,
    }))
}

/// Clears the session cookie. Session revocation belongs to the identity provider.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses((status = 303, description = "Session cookie cleared"))
)]
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        state.config.session_cookie
    );
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}
