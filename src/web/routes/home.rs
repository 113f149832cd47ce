use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use std::sync::Arc;

use crate::web::{html_page, pages, resolve_session};
use crate::AppContext;

pub async fn index(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    let page = resolve_session(&ctx, &headers).await;
    let body = match &page.session.user {
        Some(user) => pages::home(user),
        None => pages::welcome(&ctx.auth.authorize_url()),
    };
    html_page(body, page.set_cookie)
}
