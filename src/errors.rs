use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::authz::Role;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn token(err: impl Into<String>) -> Self {
        Self::Token(err.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        let error = match &self {
            AppError::NotFound(_) => "not_found",
            AppError::Configuration(_) => "configuration",
            AppError::Token(_) => "token",
            AppError::Internal(_) => "internal",
        };

        let payload = ErrorResponse {
            error: error.to_string(),
            message,
        };

        (status, Json(payload)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

/// Problems with the static route tables, detected while the service starts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid path `{0}`: expected an absolute, normalized path other than `/`")]
    InvalidPath(String),
    #[error("duplicate dashboard base path `{0}`")]
    DuplicateDashboard(String),
    #[error("nav route `{href}` is outside dashboard `{base_path}`")]
    NavOutsideDashboard { base_path: String, href: String },
    #[error("role `{0}` has no default dashboard")]
    MissingDefault(Role),
    #[error("default dashboard `{path}` is not reachable by role `{role}`")]
    UnreachableDefault { role: Role, path: String },
    #[error("duplicate legacy redirect source `{0}`")]
    DuplicateLegacySource(String),
    #[error("legacy redirect `{from}` has invalid target `{to}`")]
    InvalidLegacyTarget { from: String, to: String },
    #[error("legacy redirect `{from}` -> `{to}` chains into legacy source `{next}`")]
    LegacyChain { from: String, to: String, next: String },
    #[error("legacy source `{from}` shadows dashboard `{base_path}`")]
    LegacyShadowsDashboard { from: String, base_path: String },
    #[error("auth path `{path}` lies inside dashboard `{base_path}`")]
    AuthPathInsideDashboard { path: String, base_path: String },
    #[error("legacy source `{from}` captures auth path `{path}`")]
    LegacyCapturesAuthPath { from: String, path: String },
    #[error("login path `{0}` is not one of the auth pages")]
    LoginNotAuthPage(String),
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}
