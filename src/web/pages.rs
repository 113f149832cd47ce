//! HTML page rendering.
//!
//! Plain string templates; the only dynamic payloads are escaped text and
//! figure JSON handed to the plotting library loaded from the CDN.

use chrono::{DateTime, NaiveDate, Utc};

use crate::auth::UserProfile;
use crate::aws::{AwsKeys, CostCharts, FetchError, IamUserRecord, Region};
use crate::charts::Figure;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn display_name(user: &UserProfile) -> String {
    escape(user.name.as_deref().unwrap_or("Unknown"))
}

fn display_email(user: &UserProfile) -> String {
    escape(user.email.as_deref().unwrap_or("Unknown"))
}

fn layout(title: &str, nav: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title} — cloudlens</title>
<script src="{PLOTLY_CDN}"></script>
<style>
body {{ font-family: sans-serif; margin: 0; display: flex; }}
nav {{ width: 220px; min-height: 100vh; background: #f4f4f4; padding: 16px; }}
nav a {{ display: block; margin: 8px 0; }}
main {{ flex: 1; padding: 24px; }}
.warning {{ background: #fff3cd; padding: 12px; border-radius: 4px; margin: 8px 0; }}
.error {{ background: #f8d7da; padding: 12px; border-radius: 4px; margin: 8px 0; }}
.info {{ background: #d1ecf1; padding: 12px; border-radius: 4px; margin: 8px 0; }}
.success {{ background: #d4edda; padding: 12px; border-radius: 4px; margin: 8px 0; }}
.chart {{ max-width: 720px; margin-bottom: 24px; }}
</style>
</head>
<body>
{nav}
<main>
{content}
</main>
</body>
</html>"#
    )
}

fn nav(user: &UserProfile) -> String {
    format!(
        r#"<nav>
<h3>Navigation</h3>
<p>Signed in as: {email}</p>
<a href="/dashboard">Dashboard</a>
<a href="/profile">Profile</a>
<a href="/logout">Logout</a>
</nav>"#,
        email = display_email(user)
    )
}

/// Landing page for anonymous visitors: the login link and nothing else.
pub fn welcome(authorize_url: &str) -> String {
    let content = format!(
        r#"<h1>Welcome to cloudlens!</h1>
<div class="warning">Please log in to access this application.</div>
<p><a href="{url}">Login</a></p>"#,
        url = escape(authorize_url)
    );
    layout("Welcome", "", &content)
}

pub fn home(user: &UserProfile) -> String {
    let content = format!(
        "<h1>cloudlens</h1>\n<p>Authenticated as: {name}</p>\n<p>Pick a page from the navigation.</p>",
        name = display_name(user)
    );
    layout("Home", &nav(user), &content)
}

pub fn error_page(user: Option<&UserProfile>, message: &str) -> String {
    let nav_html = user.map(nav).unwrap_or_default();
    let content = format!(r#"<div class="error">{}</div>"#, escape(message));
    layout("Error", &nav_html, &content)
}

/// Credential form plus the authenticated identity, mirroring the profile
/// page flow: saved keys are confirmed, never echoed back.
pub fn profile(user: &UserProfile, keys: Option<&AwsKeys>, saved: bool) -> String {
    let mut content = format!(
        "<h1>User Profile</h1>\n<p>Authenticated as: {name}</p>\n<p>Email: {email}</p>\n",
        name = display_name(user),
        email = display_email(user),
    );
    if saved {
        content.push_str(r#"<div class="success">AWS credentials saved!</div>"#);
        content.push('\n');
    }
    content.push_str("<p>Provide your AWS keys and region to start fetching data:</p>\n");

    let current_region = keys.map(|k| k.region);
    let options: String = Region::ALL
        .iter()
        .map(|r| {
            let selected = if Some(*r) == current_region {
                " selected"
            } else {
                ""
            };
            format!(r#"<option value="{r}"{selected}>{r}</option>"#)
        })
        .collect();

    content.push_str(&format!(
        r#"<form method="post" action="/profile">
<label>Access Key <input type="password" name="access_key" required></label><br>
<label>Secret Key <input type="password" name="secret_key" required></label><br>
<label>AWS Region <select name="region">{options}</select></label><br>
<button type="submit">Save</button>
</form>"#
    ));

    layout("Profile", &nav(user), &content)
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

/// Everything the dashboard page shows. Each section carries its own
/// result, so one failed fetch never blanks the others.
pub struct DashboardView {
    pub compute: Result<Figure, FetchError>,
    pub storage: Result<Figure, FetchError>,
    pub cost: Result<CostCharts, FetchError>,
    pub identity: Result<Vec<IamUserRecord>, FetchError>,
    pub last_refreshed: DateTime<Utc>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn figure_div(dom_id: &str, figure: &Figure) -> String {
    format!(
        r#"<div id="{dom_id}" class="chart"></div>
<script>
(function() {{
  const fig = {json};
  Plotly.newPlot("{dom_id}", fig.data, fig.layout);
}})();
</script>"#,
        json = figure.to_json()
    )
}

fn figure_section(
    title: &str,
    dom_id: &str,
    result: &Result<Figure, FetchError>,
    unavailable: &str,
) -> String {
    let body = match result {
        Ok(figure) => figure_div(dom_id, figure),
        Err(_) => format!(r#"<div class="warning">{}</div>"#, escape(unavailable)),
    };
    format!("<h2>{title}</h2>\n{body}\n")
}

fn identity_section(result: &Result<Vec<IamUserRecord>, FetchError>) -> String {
    let mut out = String::from("<h2>IAM Users and Policies</h2>\n");
    match result {
        Err(_) => out.push_str(r#"<div class="warning">Identity data is unavailable.</div>"#),
        Ok(records) if records.is_empty() => {
            out.push_str(r#"<div class="warning">No IAM users found.</div>"#)
        }
        Ok(records) => {
            for (i, record) in records.iter().enumerate() {
                out.push_str(&format!(
                    "<p><strong>{n}. User:</strong> {name}</p>\n<strong>Attached Policies:</strong>\n<ol>\n",
                    n = i + 1,
                    name = escape(&record.user_name)
                ));
                for policy in &record.policies {
                    out.push_str(&format!("<li>{}</li>\n", escape(policy)));
                }
                out.push_str("</ol>\n");
            }
        }
    }
    out
}

pub fn dashboard(user: &UserProfile, view: &DashboardView) -> String {
    let mut content = String::from("<h1>cloudlens Dashboard</h1>\n");

    content.push_str(&format!(
        r#"<div class="info">Last Refreshed: {}</div>"#,
        view.last_refreshed.format("%Y-%m-%d %I:%M:%S %p")
    ));
    content.push('\n');
    content.push_str(&format!(
        r#"<form method="get" action="/dashboard">
<label>Start Date <input type="date" name="start" value="{start}"></label>
<label>End Date <input type="date" name="end" value="{end}"></label>
<button type="submit">Apply</button>
</form>
<form method="post" action="/dashboard/refresh"><button type="submit">Refresh Data</button></form>
"#,
        start = view.start,
        end = view.end,
    ));

    content.push_str(&figure_section(
        "EC2 Instances",
        "ec2_chart",
        &view.compute,
        "EC2 data is unavailable.",
    ));
    content.push_str(&figure_section(
        "S3 Buckets",
        "s3_chart",
        &view.storage,
        "S3 data is unavailable.",
    ));

    content.push_str("<h2>Cost Analysis</h2>\n");
    match &view.cost {
        Ok(charts) => {
            content.push_str(&figure_div("cost_service_chart", &charts.service_chart));
            content.push('\n');
            content.push_str(&figure_div("cost_summary_chart", &charts.summary_chart));
            content.push('\n');
        }
        Err(_) => {
            content.push_str(r#"<div class="warning">Cost data is unavailable.</div>"#);
            content.push('\n');
        }
    }

    content.push_str(&identity_section(&view.identity));

    layout("Dashboard", &nav(user), &content)
}
