// web/routes/auth.rs — login link, provider callback, logout.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::web::{html_page, pages, redirect, resolve_session, session_id};
use crate::AppContext;

/// The login page only presents the authorization link; the redirect to the
/// provider happens when the user clicks it.
pub async fn login(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    let page = resolve_session(&ctx, &headers).await;
    html_page(pages::welcome(&ctx.auth.authorize_url()), page.set_cookie)
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let page = resolve_session(&ctx, &headers).await;
    match ctx.auth.complete_callback(query.code.as_deref()).await {
        Ok(Some(profile)) => {
            info!(sub = %profile.sub, "login completed");
            ctx.sessions.set_user(&page.id, profile).await;
            redirect("/", page.set_cookie)
        }
        // No code in the query: a plain visit, back to the welcome page.
        Ok(None) => html_page(pages::welcome(&ctx.auth.authorize_url()), page.set_cookie),
        Err(e) => {
            warn!("login callback failed: {e}");
            html_page(
                pages::error_page(None, &format!("Login failed: {e}")),
                page.set_cookie,
            )
        }
    }
}

/// Drops the local session first, then sends the browser to the provider's
/// logout endpoint.
pub async fn logout(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id(&headers) {
        ctx.sessions.remove(&id).await;
    }
    let url = ctx.auth.logout_url();
    Redirect::to(&url).into_response()
}
