use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use super::decision::{AccessGate, Decision};
use super::middleware::redirect_response;
use crate::app::AppState;
use crate::authz::Identity;
use crate::errors::AppError;
use crate::identity::CurrentIdentity;
use crate::routing::Dashboard;

/// Render-time re-check for one dashboard area.
///
/// Uses the same predicate as the edge gate, so for a given identity and
/// path both reach the same verdict.
pub fn check_area(
    gate: &AccessGate,
    dashboard: &Dashboard,
    path_and_query: &str,
    identity: &Identity,
) -> Result<(), Decision> {
    match gate.dashboard_verdict(dashboard, path_and_query, identity) {
        Decision::Continue(_) => Ok(()),
        denied => Err(denied),
    }
}

/// Extractor for dashboard handlers: the owning dashboard plus a caller that
/// passed [`check_area`] for it.
#[derive(Debug, Clone)]
pub struct AreaAccess {
    pub dashboard: Dashboard,
    pub identity: Identity,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AreaAccess {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentIdentity(identity) = CurrentIdentity::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());

        let Some(dashboard) = state.gate.get_current_dashboard(path_and_query) else {
            return Err(AppError::not_found("no dashboard owns this path").into_response());
        };

        if let Err(decision) = check_area(&state.gate, dashboard, path_and_query, &identity) {
            tracing::info!(
                area = %dashboard.base_path,
                role = %identity.role,
                state = ?decision.state(),
                "layout check denied access"
            );
            return Err(redirect_response(&decision));
        }

        Ok(AreaAccess {
            dashboard: dashboard.clone(),
            identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::{Role, SessionUser};
    use proptest::prelude::*;
    use uuid::Uuid;

    proptest! {
        #[test]
        fn layout_and_edge_agree(
            role in prop::sample::select(Role::ALL.to_vec()),
            authenticated in prop::bool::ANY,
            base in prop::sample::select(vec!["/affiliates", "/clinic", "/finance", "/support", "/admin"]),
            tail in "(/[a-z]{1,8}){0,3}",
        ) {
            let gate = AccessGate::standard().unwrap();
            let identity = if authenticated {
                Identity::authenticated(
                    SessionUser { id: Uuid::new_v4(), email: "p@example.com".into() },
                    role,
                )
            } else {
                Identity::anonymous()
            };
            let path = format!("{base}{tail}");
            let dashboard = gate.get_current_dashboard(&path).unwrap();

            let edge = gate.decide(&path, &identity);
            let layout = check_area(&gate, dashboard, &path, &identity);

            prop_assert_eq!(edge.is_continue(), layout.is_ok());
            if let Err(denied) = layout {
                prop_assert_eq!(denied, edge);
            }
        }
    }
}
