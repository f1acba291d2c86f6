use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use configs::{AppConfig, HashingConfig};
use serde_json::{json, Value};
use service::auth::token::TokenIssuer;
use tower::Service;

use server::startup;

const SECRET: &str = "test-secret";

fn test_config(base_path: &str) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = SECRET.into();
    cfg.auth.hashing = HashingConfig { memory_kib: 64, iterations: 1, parallelism: 1 };
    cfg.server.base_path = base_path.into();
    cfg
}

async fn build_app_at(base_path: &str) -> anyhow::Result<Router> {
    let cfg = test_config(base_path);
    let state = startup::build_state(&cfg).await?;
    Ok(startup::build_app(&cfg, state))
}

async fn build_app() -> anyhow::Result<Router> {
    build_app_at("").await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, json))
}

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    let app = build_app().await?;

    let (status, reg) = send(&app, "POST", "/register", Some(json!({"email": "a@x.com", "password": "pw1"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reg["email"], "a@x.com");
    assert_eq!(reg["name"], "a@x.com");
    assert_eq!(reg["role"], "patient");
    assert_eq!(reg["isActive"], true);
    assert!(reg["lastLoginAt"].is_null());
    assert!(reg["createdAt"].is_string());
    assert_eq!(reg["accessToken"], reg["refreshToken"]);

    let (status, dup) = send(&app, "POST", "/register", Some(json!({"email": "a@x.com", "password": "pw2"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(dup, json!({"message": "User already exists"}));

    let (status, login) = send(&app, "POST", "/login", Some(json!({"email": "a@x.com", "password": "pw1"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["_id"], reg["_id"]);
    assert!(login["lastLoginAt"].is_string());

    let token = login["accessToken"].as_str().expect("token string");
    let claims = TokenIssuer::new(SECRET, None).decode(token)?;
    assert_eq!(Some(claims.sub.as_str()), reg["_id"].as_str());
    assert_eq!(claims.email, "a@x.com");
    assert!(claims.exp.is_none());

    let (status, wrong) = send(&app, "POST", "/login", Some(json!({"email": "a@x.com", "password": "wrong"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong, json!({"message": "Email or password is incorrect"}));
    Ok(())
}

#[tokio::test]
async fn test_wrong_password_matches_unknown_email() -> anyhow::Result<()> {
    let app = build_app().await?;
    let _ = send(&app, "POST", "/register", Some(json!({"email": "b@x.com", "password": "StrongPass123"}))).await?;

    let wrong = send(&app, "POST", "/login", Some(json!({"email": "b@x.com", "password": "nope"}))).await?;
    let unknown = send(&app, "POST", "/login", Some(json!({"email": "ghost@x.com", "password": "StrongPass123"}))).await?;
    let missing = send(&app, "POST", "/login", Some(json!({"email": "b@x.com"}))).await?;
    assert_eq!(wrong, unknown);
    assert_eq!(wrong, missing);
    assert_eq!(wrong.0, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_config_is_idempotent() -> anyhow::Result<()> {
    let app = build_app().await?;
    for _ in 0..3 {
        let (status, body) = send(&app, "GET", "/config", None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"strategy": "email"}));
    }
    Ok(())
}

#[tokio::test]
async fn test_register_with_role_and_missing_fields() -> anyhow::Result<()> {
    let app = build_app().await?;

    let (status, doc) = send(&app, "POST", "/register", Some(json!({"email": "doc@x.com", "password": "pw", "role": "doctor"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["role"], "doctor");

    let (status, body) = send(&app, "POST", "/register", Some(json!({"email": "nopw@x.com"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Email and password are required"}));
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_400_with_message() -> anyhow::Result<()> {
    let app = build_app().await?;
    let req = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_routes_under_base_path() -> anyhow::Result<()> {
    let app = build_app_at("/api/auth").await?;

    let (status, body) = send(&app, "GET", "/api/auth/config", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"], "email");

    let (status, _) = send(&app, "GET", "/config", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_openapi_document_lists_auth_paths() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    for path in ["/config", "/register", "/login", "/health"] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
    Ok(())
}

async fn send_raw(app: &Router, uri: &str, content_type: Option<&str>, body: &'static str) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let resp = app.clone().call(builder.body(Body::from(body))?).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn test_unreadable_login_body_looks_like_bad_credentials() -> anyhow::Result<()> {
    let app = build_app().await?;
    let expected = (StatusCode::BAD_REQUEST, json!({"message": "Email or password is incorrect"}));

    let malformed = send_raw(&app, "/login", Some("application/json"), "{not json").await?;
    let wrong_type = send_raw(&app, "/login", Some("application/json"), r#"{"email": 5, "password": "pw"}"#).await?;
    let no_content_type = send_raw(&app, "/login", None, r#"{"email": "a@x.com", "password": "pw"}"#).await?;
    assert_eq!(malformed, expected);
    assert_eq!(wrong_type, expected);
    assert_eq!(no_content_type, expected);
    Ok(())
}

#[tokio::test]
async fn test_openapi_paths_follow_base_path() -> anyhow::Result<()> {
    let app = build_app_at("/api/auth").await?;
    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    for path in ["/api/auth/config", "/api/auth/register", "/api/auth/login", "/health"] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
    assert!(doc["paths"].get("/config").is_none());
    Ok(())
}
