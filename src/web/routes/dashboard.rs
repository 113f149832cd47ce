// web/routes/dashboard.rs — the four visualizations on one page.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::web::pages::{self, DashboardView};
use crate::web::{html_page, redirect, resolve_session};
use crate::AppContext;

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

pub async fn show(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let page = resolve_session(&ctx, &headers).await;
    let Some(user) = page.session.user.clone() else {
        return redirect("/", page.set_cookie);
    };
    let Some(keys) = page.session.aws_keys.clone() else {
        return html_page(
            pages::error_page(Some(&user), "Please complete your profile to fetch AWS data."),
            page.set_cookie,
        );
    };

    let today = Utc::now().date_naive();
    let start = query.start.unwrap_or_else(|| today - Duration::days(30));
    let end = query.end.unwrap_or(today);
    if start > end {
        return html_page(
            pages::error_page(Some(&user), "Start date cannot be after end date."),
            page.set_cookie,
        );
    }

    let last_refreshed = match page.session.last_refreshed {
        Some(at) => at,
        None => {
            let now = Utc::now();
            ctx.sessions.touch_refreshed(&page.id, now).await;
            now
        }
    };

    // Sequential on purpose: the page blocks on each provider call in turn,
    // and total latency is their sum.
    let compute = ctx.cloud.compute_overview(&keys).await;
    let storage = ctx.cloud.storage_overview(&keys).await;
    let cost = ctx.cloud.cost_overview(&keys, start, end).await;
    let identity = ctx.cloud.identity_inventory(&keys).await;

    if let Err(e) = &compute {
        warn!("compute overview failed: {e}");
    }
    if let Err(e) = &storage {
        warn!("storage overview failed: {e}");
    }
    if let Err(e) = &cost {
        warn!("cost overview failed: {e}");
    }
    if let Err(e) = &identity {
        warn!("identity inventory failed: {e}");
    }

    let view = DashboardView {
        compute,
        storage,
        cost,
        identity,
        last_refreshed,
        start,
        end,
    };
    html_page(pages::dashboard(&user, &view), page.set_cookie)
}

/// Stamps `last_refreshed` and bounces back to the dashboard.
pub async fn refresh(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    let page = resolve_session(&ctx, &headers).await;
    if page.session.user.is_some() {
        ctx.sessions.touch_refreshed(&page.id, Utc::now()).await;
    }
    redirect("/dashboard", page.set_cookie)
}
