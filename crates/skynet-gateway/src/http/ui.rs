//! GET / — a minimal static page pointing integrators at the JSON API.
//! There is no bundled single-page app in this workspace; a dedicated
//! front end is expected to talk to the REST surface under `/chat`,
//! `/search`, `/reminders`, etc. directly.

use axum::response::Html;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>skynet gateway</title></head>
<body>
<h1>skynet gateway</h1>
<p>REST API is live. See <code>GET /health</code> for status and the
project documentation for the full endpoint surface.</p>
</body>
</html>"#;

pub async fn ui_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
