// web/routes/profile.rs — AWS credential capture form.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::aws::{AwsKeys, Region};
use crate::web::{html_page, pages, redirect, resolve_session};
use crate::AppContext;

pub async fn show(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    let page = resolve_session(&ctx, &headers).await;
    let Some(user) = &page.session.user else {
        return redirect("/", page.set_cookie);
    };
    html_page(
        pages::profile(user, page.session.aws_keys.as_ref(), false),
        page.set_cookie,
    )
}

#[derive(Deserialize)]
pub struct ProfileForm {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Stores the submitted keys verbatim in the session. The region is the only
/// field with any structure; format of the keys is not checked — bad keys
/// fail at the first provider call.
pub async fn save(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Form(form): Form<ProfileForm>,
) -> Response {
    let page = resolve_session(&ctx, &headers).await;
    let Some(user) = page.session.user.clone() else {
        return redirect("/", page.set_cookie);
    };

    let Some(region) = Region::parse(&form.region) else {
        return html_page(
            pages::error_page(Some(&user), "Unknown AWS region."),
            page.set_cookie,
        );
    };

    let keys = AwsKeys {
        access_key: form.access_key,
        secret_key: form.secret_key,
        region,
    };
    ctx.sessions.set_aws_keys(&page.id, keys).await;
    info!(%region, "stored AWS keys for session");

    let session = ctx.sessions.get(&page.id).await.unwrap_or_default();
    html_page(
        pages::profile(&user, session.aws_keys.as_ref(), true),
        page.set_cookie,
    )
}
