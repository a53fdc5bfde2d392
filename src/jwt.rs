use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use uuid::Uuid;

use crate::authz::{Identity, SessionUser};
use crate::errors::AppError;
use crate::identity::IdentityProvider;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Arc<Vec<u8>>,
    pub exp_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<Vec<u8>>, exp_hours: i64) -> Self {
        Self {
            secret: Arc::new(secret.into()),
            exp_hours,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| AppError::configuration("JWT_SECRET not set"))?;
        let exp_hours = std::env::var("JWT_EXP_HOURS")
            .map(|val| val.parse::<i64>())
            .unwrap_or(Ok(24))
            .map_err(|_| AppError::configuration("JWT_EXP_HOURS must be a valid integer"))?;

        Ok(Self::new(secret.into_bytes(), exp_hours))
    }

    /// Issues a session token. `role` is stored verbatim so stale or foreign
    /// claims can be reproduced.
    pub fn encode(&self, user_id: Uuid, email: &str, role: Value) -> Result<String, AppError> {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let exp = now + Duration::hours(self.exp_hours);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role: Some(role),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|err| AppError::token(err.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| AppError::token(err.to_string()))
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: String,
    /// Arbitrary JSON; normalized by [`crate::authz::Role::parse_claim`].
    #[serde(default)]
    pub role: Option<Value>,
    pub exp: usize,
    pub iat: usize,
}

/// Session token from the named cookie, falling back to a bearer header.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
    })
}

/// Identity source backed by HS256 session tokens.
#[derive(Debug, Clone)]
pub struct JwtIdentityProvider {
    jwt: Arc<JwtConfig>,
    cookie_name: String,
}

impl JwtIdentityProvider {
    pub fn new(jwt: JwtConfig, cookie_name: impl Into<String>) -> Self {
        Self {
            jwt: Arc::new(jwt),
            cookie_name: cookie_name.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn get_identity(&self, headers: &HeaderMap) -> Result<Identity, AppError> {
        let Some(token) = session_token(headers, &self.cookie_name) else {
            return Ok(Identity::anonymous());
        };

        let claims = self.jwt.decode(token)?;
        let user = SessionUser {
            id: claims.sub,
            email: claims.email,
        };

        Ok(Identity::from_claim(Some(user), claims.role.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::Role;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn provider() -> (JwtConfig, JwtIdentityProvider) {
        let jwt = JwtConfig::new("unit-secret", 1);
        (jwt.clone(), JwtIdentityProvider::new(jwt, "portal_session"))
    }

    #[tokio::test]
    async fn cookie_session_resolves_user_and_role() {
        let (jwt, provider) = provider();
        let user_id = Uuid::new_v4();
        let token = jwt.encode(user_id, "fin@example.com", json!("finance")).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; portal_session={token}")).unwrap(),
        );

        let identity = provider.get_identity(&headers).await.unwrap();
        assert_eq!(identity.user.map(|user| user.id), Some(user_id));
        assert_eq!(identity.role, Role::Finance);
    }

    #[tokio::test]
    async fn bearer_header_is_accepted() {
        let (jwt, provider) = provider();
        let token = jwt.encode(Uuid::new_v4(), "a@example.com", json!("admin")).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let identity = provider.get_identity(&headers).await.unwrap();
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn missing_token_is_anonymous() {
        let (_, provider) = provider();
        let identity = provider.get_identity(&HeaderMap::new()).await.unwrap();
        assert!(!identity.is_authenticated());
    }

    #[tokio::test]
    async fn foreign_signature_is_an_error() {
        let (_, provider) = provider();
        let other = JwtConfig::new("someone-else", 1);
        let token = other.encode(Uuid::new_v4(), "x@example.com", json!("admin")).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("portal_session={token}")).unwrap(),
        );

        assert!(matches!(provider.get_identity(&headers).await, Err(AppError::Token(_))));
    }

    #[test]
    fn session_token_ignores_similar_cookie_names() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("portal_session_old=stale; portal_session=fresh"),
        );
        assert_eq!(session_token(&headers, "portal_session"), Some("fresh"));
    }
}
