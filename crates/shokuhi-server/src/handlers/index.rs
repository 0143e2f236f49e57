//! The single-page dashboard.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serves the dashboard page. All interaction goes through `POST /api/v1/dashboard`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
