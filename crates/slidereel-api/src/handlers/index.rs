use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Upload form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
