use std::sync::Arc;

use axum::http::{HeaderMap, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::authz::Identity;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::gate::{access_gate, AccessGate};
use crate::identity::{self, IdentityProvider};
use crate::jwt::{JwtConfig, JwtIdentityProvider};
use crate::routes::{auth, dashboards, health, pages, session};

#[derive(Clone)]
pub struct AppState {
    pub gate: AccessGate,
    pub identity: Arc<dyn IdentityProvider>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(gate: AccessGate, identity: Arc<dyn IdentityProvider>, config: AppConfig) -> Self {
        Self {
            gate,
            identity,
            config: Arc::new(config),
        }
    }

    pub async fn resolve_identity(&self, headers: &HeaderMap) -> Identity {
        identity::resolve_identity(self.identity.as_ref(), headers, self.config.identity_timeout).await
    }
}

/// Router wired from the environment. Fails when the route tables or the
/// session settings are invalid, so a misconfigured service never serves.
pub async fn create_app() -> Result<Router, AppError> {
    create_app_with(AppConfig::from_env()?).await
}

/// Same as [`create_app`] with settings the caller already loaded.
pub async fn create_app_with(config: AppConfig) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let gate = AccessGate::standard()?;

    tracing::info!(
        dashboards = gate.registry().dashboards().len(),
        legacy_redirects = gate.legacy().entries().len(),
        "route tables validated"
    );

    let provider = JwtIdentityProvider::new(jwt_config, config.session_cookie.clone());
    let state = AppState::new(gate, Arc::new(provider), config);

    Ok(build_router(state))
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(pages::home))
        .route("/api/health", get(health::health))
        .route("/api/me", get(session::me))
        .route("/api/navigation", get(session::navigation))
        .route("/auth/login", get(auth::login_page))
        .route("/auth/sign-up", get(auth::sign_up_page))
        .route("/auth/forgot-password", get(auth::forgot_password_page))
        .route("/auth/update-password", get(auth::update_password_page))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/confirm", get(auth::callback))
        .route("/auth/error", get(auth::error_page))
        .route("/auth/logout", post(auth::logout));

    // one route pair per dashboard; the area layout re-checks access
    for dashboard in state.gate.registry().dashboards() {
        let base = dashboard.base_path.as_str();
        router = router
            .route(base, get(dashboards::show))
            .route(&format!("{base}/*rest"), get(dashboards::show));
    }

    router
        .fallback(pages::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), access_gate))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
