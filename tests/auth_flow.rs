//! Auth flow integration tests.
//!
//! A stub identity provider runs on an ephemeral local port; the app points
//! at it via an explicit `http://` domain. No real provider is contacted.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cloudlens::config::{AppConfig, AuthSettings};
use cloudlens::{web, AppContext};

// ─── Stub identity provider ───────────────────────────────────────────────────

struct StubProvider {
    token_hits: AtomicUsize,
    userinfo_hits: AtomicUsize,
    fail_token_exchange: bool,
}

async fn spawn_stub(fail_token_exchange: bool) -> (SocketAddr, Arc<StubProvider>) {
    let stub = Arc::new(StubProvider {
        token_hits: AtomicUsize::new(0),
        userinfo_hits: AtomicUsize::new(0),
        fail_token_exchange,
    });
    let router = Router::new()
        .route("/oauth/token", post(token_endpoint))
        .route("/userinfo", get(userinfo_endpoint))
        .with_state(stub.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, stub)
}

async fn token_endpoint(
    State(stub): State<Arc<StubProvider>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.token_hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(body["grant_type"], "authorization_code");
    assert_eq!(body["client_id"], "test-client");
    if stub.fail_token_exchange {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "server_error" })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({ "access_token": "test-token", "token_type": "Bearer" })),
        )
    }
}

async fn userinfo_endpoint(
    State(stub): State<Arc<StubProvider>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    stub.userinfo_hits.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != "Bearer test-token" {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "sub": "auth0|42",
            "name": "Test User",
            "email": "test@example.com",
        })),
    )
}

// ─── App under test ───────────────────────────────────────────────────────────

fn app_config(provider: SocketAddr) -> AppConfig {
    AppConfig {
        port: 0,
        bind_address: "127.0.0.1".into(),
        log: "info".into(),
        auth: AuthSettings {
            domain: format!("http://{provider}"),
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
            callback_url: "http://localhost:8080/callback".into(),
            logout_url: "http://localhost:8080/".into(),
        },
    }
}

async fn spawn_app(ctx: Arc<AppContext>) -> SocketAddr {
    let router = web::build_router(ctx);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn session_cookie_id(resp: &reqwest::Response) -> Option<String> {
    let cookie = resp.headers().get("set-cookie")?.to_str().ok()?;
    let (name_value, _) = cookie.split_once(';')?;
    let (_, id) = name_value.split_once('=')?;
    Some(id.to_string())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn callback_without_code_makes_no_provider_call() {
    let (provider, stub) = spawn_stub(false).await;
    let ctx = Arc::new(AppContext::new(app_config(provider)).unwrap());
    let app = spawn_app(ctx.clone()).await;

    let resp = http_client()
        .get(format!("http://{app}/callback"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let id = session_cookie_id(&resp).unwrap();
    let body = resp.text().await.unwrap();
    assert!(body.contains("Please log in"));

    assert_eq!(stub.token_hits.load(Ordering::SeqCst), 0);
    assert_eq!(stub.userinfo_hits.load(Ordering::SeqCst), 0);
    assert!(ctx.sessions.get(&id).await.unwrap().user.is_none());
}

#[tokio::test]
async fn failed_token_exchange_leaves_profile_unset() {
    let (provider, stub) = spawn_stub(true).await;
    let ctx = Arc::new(AppContext::new(app_config(provider)).unwrap());
    let app = spawn_app(ctx.clone()).await;

    let resp = http_client()
        .get(format!("http://{app}/callback?code=abc123"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let id = session_cookie_id(&resp).unwrap();
    let body = resp.text().await.unwrap();
    assert!(body.contains("Login failed"));

    assert_eq!(stub.token_hits.load(Ordering::SeqCst), 1);
    assert_eq!(stub.userinfo_hits.load(Ordering::SeqCst), 0);
    assert!(ctx.sessions.get(&id).await.unwrap().user.is_none());
}

#[tokio::test]
async fn successful_login_stores_profile_and_redirects_home() {
    let (provider, stub) = spawn_stub(false).await;
    let ctx = Arc::new(AppContext::new(app_config(provider)).unwrap());
    let app = spawn_app(ctx.clone()).await;

    let resp = http_client()
        .get(format!("http://{app}/callback?code=abc123"))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get("location").unwrap(), "/");
    let id = session_cookie_id(&resp).unwrap();

    let user = ctx.sessions.get(&id).await.unwrap().user.unwrap();
    assert_eq!(user.sub, "auth0|42");
    assert_eq!(user.email.as_deref(), Some("test@example.com"));
    assert_eq!(stub.token_hits.load(Ordering::SeqCst), 1);
    assert_eq!(stub.userinfo_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn logout_clears_profile_then_redirects_to_provider() {
    let (provider, _stub) = spawn_stub(false).await;
    let ctx = Arc::new(AppContext::new(app_config(provider)).unwrap());
    let app = spawn_app(ctx.clone()).await;

    // Seed an authenticated session.
    let id = ctx.sessions.create().await;
    ctx.sessions
        .set_user(
            &id,
            cloudlens::auth::UserProfile {
                sub: "auth0|42".into(),
                name: None,
                email: None,
            },
        )
        .await;

    let resp = http_client()
        .get(format!("http://{app}/logout"))
        .header("cookie", format!("cloudlens_session={id}"))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with(&format!("http://{provider}/v2/logout?")));
    assert!(location.contains("client_id=test-client"));
    assert!(location.contains("returnTo="));

    // The whole session — profile included — is gone.
    assert!(ctx.sessions.get(&id).await.is_none());
}
