use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::authz::{Role, SessionUser};
use crate::routes::{auth, dashboards, health, session};
use crate::routing::{NavIcon, NavRoute};

#[derive(OpenApi)]
#[openapi(
	paths(
		health::health,
		session::me,
		session::navigation,
		auth::login_page,
		auth::callback,
		auth::logout
	),
	components(
		schemas(
			Role,
			SessionUser,
			NavIcon,
			NavRoute,
			health::HealthResponse,
			session::MeResponse,
			session::NavigationView,
			dashboards::DashboardView,
			auth::AuthPage
		)
	),
	tags(
		(name = "Health", description = "Liveness"),
		(name = "Session", description = "Current caller and dashboard navigation"),
		(name = "Auth", description = "Auth pages and session flow")
	)
)]
pub struct ApiDoc;

/// OpenAPI document with the session cookie scheme and a local server entry.
pub fn build_openapi(port: u16, session_cookie: &str) -> anyhow::Result<Value> {
	let mut doc = serde_json::to_value(ApiDoc::openapi())?;

	ensure_security_components(&mut doc, session_cookie);
	ensure_servers(&mut doc, port);

	Ok(doc)
}

pub fn swagger_routes(doc: Value) -> Router {
	let swagger_config = utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
		.try_it_out_enabled(true)
		.with_credentials(true);

	let doc = Arc::new(doc);
	let json_route = get(move || {
		let doc = Arc::clone(&doc);
		async move { Json((*doc).clone()) }
	});

	Router::new()
		.route("/api-docs/openapi.json", json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config))
}

fn ensure_security_components(doc: &mut Value, session_cookie: &str) {
	let Some(root) = doc.as_object_mut() else {
		return;
	};

	let components = root.entry("components").or_insert_with(|| json!({}));
	if let Some(components) = components.as_object_mut() {
		let schemes = components
			.entry("securitySchemes")
			.or_insert_with(|| json!({}));
		if let Some(schemes) = schemes.as_object_mut() {
			schemes.insert(
				"sessionCookie".to_string(),
				json!({"type": "apiKey", "in": "cookie", "name": session_cookie}),
			);
			schemes.insert(
				"bearerAuth".to_string(),
				json!({"type": "http", "scheme": "bearer", "bearerFormat": "JWT"}),
			);
		}
	}

	root.entry("security")
		.or_insert_with(|| json!([{"sessionCookie": []}, {"bearerAuth": []}]));
}

fn ensure_servers(doc: &mut Value, port: u16) {
	if doc.get("servers").is_none() {
		doc["servers"] = json!([{ "url": format!("http://localhost:{port}") }]);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn document_lists_session_endpoints_and_cookie_scheme() {
		let doc = build_openapi(8000, "portal_session").unwrap();

		assert!(doc.pointer("/paths/~1api~1me/get").is_some());
		assert!(doc.pointer("/paths/~1api~1navigation/get").is_some());
		assert_eq!(
			doc.pointer("/components/securitySchemes/sessionCookie/name"),
			Some(&json!("portal_session"))
		);
		assert_eq!(doc.pointer("/servers/0/url"), Some(&json!("http://localhost:8000")));
	}
}
