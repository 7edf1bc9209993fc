//! Upload page.

use axum::response::Html;

/// Single-page upload form with both conversion buttons.
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Handle GET /.
pub(crate) async fn get_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
