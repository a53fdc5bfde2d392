use std::time::Duration;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::app::AppState;
use crate::authz::Identity;
use crate::errors::AppError;

/// External session collaborator: answers "who is calling, with which role claim".
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_identity(&self, headers: &HeaderMap) -> Result<Identity, AppError>;
}

/// Single bounded lookup. Errors and timeouts degrade to an anonymous
/// identity; there is no retry here.
pub async fn resolve_identity(
    provider: &dyn IdentityProvider,
    headers: &HeaderMap,
    timeout: Duration,
) -> Identity {
    match tokio::time::timeout(timeout, provider.get_identity(headers)).await {
        Ok(Ok(identity)) => identity,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "identity lookup failed, continuing anonymously");
            Identity::anonymous()
        }
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "identity lookup timed out, continuing anonymously");
            Identity::anonymous()
        }
    }
}

/// Identity established by the access gate for this request.
///
/// Falls back to a fresh lookup when the gate middleware is not installed.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(CurrentIdentity(identity.clone()));
        }

        let identity = state.resolve_identity(&parts.headers).await;
        parts.extensions.insert(identity.clone());
        Ok(CurrentIdentity(identity))
    }
}
