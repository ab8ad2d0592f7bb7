use axum::response::Html;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Single-page UI: sidebar navigation plus the active view's main area.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
