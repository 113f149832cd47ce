// web/mod.rs — HTTP layer for the dashboard pages.
//
// Axum server. Every handler resolves the browser session from the cookie
// first; a fresh session (and Set-Cookie) is minted on first contact.
//
// Routes:
//   GET  /                    welcome or navigation
//   GET  /login               login link page
//   GET  /callback            provider redirect target (?code=...)
//   GET  /logout              drop session, redirect to provider logout
//   GET  /profile             credential form
//   POST /profile             store AWS keys in the session
//   GET  /dashboard           the four visualizations (?start&end)
//   POST /dashboard/refresh   stamp last_refreshed
//   GET  /healthz             liveness JSON

pub mod pages;
pub mod routes;

use anyhow::Result;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::session::{Session, SESSION_COOKIE};
use crate::AppContext;

pub async fn start_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(routes::home::index))
        .route("/login", get(routes::auth::login))
        .route("/callback", get(routes::auth::callback))
        .route("/logout", get(routes::auth::logout))
        .route(
            "/profile",
            get(routes::profile::show).post(routes::profile::save),
        )
        .route("/dashboard", get(routes::dashboard::show))
        .route("/dashboard/refresh", post(routes::dashboard::refresh))
        .route("/healthz", get(routes::health::health))
        .with_state(ctx)
}

// ─── Session cookie plumbing ──────────────────────────────────────────────────

/// Session id from the request Cookie header, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// The resolved browser session for one request. `set_cookie` is present
/// only when the session was just created.
pub(crate) struct PageSession {
    pub id: String,
    pub session: Session,
    pub set_cookie: Option<String>,
}

pub(crate) async fn resolve_session(ctx: &AppContext, headers: &HeaderMap) -> PageSession {
    if let Some(id) = session_id(headers) {
        if let Some(session) = ctx.sessions.get(&id).await {
            return PageSession {
                id,
                session,
                set_cookie: None,
            };
        }
    }
    let id = ctx.sessions.create().await;
    let set_cookie = Some(session_cookie(&id));
    PageSession {
        id,
        session: Session::default(),
        set_cookie,
    }
}

// ─── Response helpers ─────────────────────────────────────────────────────────

fn with_cookie(mut resp: Response, set_cookie: Option<String>) -> Response {
    if let Some(cookie) = set_cookie {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            resp.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    resp
}

pub(crate) fn html_page(body: String, set_cookie: Option<String>) -> Response {
    with_cookie(Html(body).into_response(), set_cookie)
}

pub(crate) fn redirect(to: &str, set_cookie: Option<String>) -> Response {
    with_cookie(Redirect::to(to).into_response(), set_cookie)
}
