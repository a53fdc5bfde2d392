use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use portal_gate::create_app;
use portal_gate::jwt::JwtConfig;

async fn app() -> Result<Router> {
    std::env::set_var("JWT_SECRET", "test-secret");
    Ok(create_app().await?)
}

fn cookie_for(user_id: Uuid, role: &str) -> Result<String> {
    let token = JwtConfig::new("test-secret", 1).encode(user_id, "person@example.com", json!(role))?;
    Ok(format!("portal_session={token}"))
}

async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>) -> Result<Response> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    Ok(app.clone().oneshot(req.body(Body::empty())?).await?)
}

async fn json_body(resp: Response) -> Result<Value> {
    let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn me_describes_the_caller() -> Result<()> {
    let app = app().await?;

    let resp = send(&app, "GET", "/api/me", None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await?;
    assert_eq!(v["authenticated"], false);
    assert_eq!(v["role"], Value::Null);

    let user_id = Uuid::new_v4();
    let cookie = cookie_for(user_id, "clinic")?;
    let v = json_body(send(&app, "GET", "/api/me", Some(&cookie)).await?).await?;
    assert_eq!(v["authenticated"], true);
    assert_eq!(v["user"]["id"], user_id.to_string());
    assert_eq!(v["role"], "clinic");
    assert_eq!(v["role_label"], "Clinic Professional");
    assert_eq!(v["home"], "/clinic");

    Ok(())
}

#[tokio::test]
async fn navigation_follows_role_access() -> Result<()> {
    let app = app().await?;

    let admin = cookie_for(Uuid::new_v4(), "admin")?;
    let v = json_body(send(&app, "GET", "/api/navigation?path=%2Fadmin%2Fusers%2F42", Some(&admin)).await?).await?;
    assert_eq!(v["base_path"], "/admin");
    assert_eq!(v["requirement"], "admin");
    assert_eq!(v["active"]["href"], "/admin/users");
    assert!(v["nav"].as_array().map(|nav| !nav.is_empty()).unwrap_or(false));

    let support = cookie_for(Uuid::new_v4(), "support")?;
    let v = json_body(send(&app, "GET", "/api/navigation?path=%2Fadmin", Some(&support)).await?).await?;
    assert_eq!(v, Value::Null);

    let v = json_body(send(&app, "GET", "/api/navigation?path=%2Fsupport%2Ftickets", None).await?).await?;
    assert_eq!(v, Value::Null, "anonymous callers get no sidebar");

    let v = json_body(send(&app, "GET", "/api/navigation?path=%2Fabout", Some(&admin)).await?).await?;
    assert_eq!(v, Value::Null, "public pages have no dashboard");

    Ok(())
}

#[tokio::test]
async fn home_links_signed_in_visitors_to_their_dashboard() -> Result<()> {
    let app = app().await?;

    let v = json_body(send(&app, "GET", "/", None).await?).await?;
    assert_eq!(v["authenticated"], false);
    assert_eq!(v["dashboard"], Value::Null);

    let cookie = cookie_for(Uuid::new_v4(), "finance")?;
    let v = json_body(send(&app, "GET", "/", Some(&cookie)).await?).await?;
    assert_eq!(v["dashboard"], "/finance");

    Ok(())
}

#[tokio::test]
async fn callback_routes_by_session() -> Result<()> {
    let app = app().await?;

    let resp = send(&app, "GET", "/auth/callback", None).await?;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/auth/error?reason=missing_session")
    );

    let cookie = cookie_for(Uuid::new_v4(), "support")?;
    let resp = send(&app, "GET", "/auth/confirm?next=%2Fsupport%2Ftickets", Some(&cookie)).await?;
    assert_eq!(
        resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/support/tickets")
    );

    let resp = send(&app, "GET", "/auth/callback?next=%2F%2Fevil.example", Some(&cookie)).await?;
    assert_eq!(
        resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/support")
    );

    let v = json_body(send(&app, "GET", "/auth/error?reason=missing_session", None).await?).await?;
    assert_eq!(v["reason"], "missing_session");

    Ok(())
}

#[tokio::test]
async fn logout_expires_the_session_cookie() -> Result<()> {
    let app = app().await?;
    let cookie = cookie_for(Uuid::new_v4(), "affiliate")?;

    let resp = send(&app, "POST", "/auth/logout", Some(&cookie)).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(set_cookie.starts_with("portal_session=;"), "got {set_cookie}");
    assert!(set_cookie.contains("Max-Age=0"));

    Ok(())
}
