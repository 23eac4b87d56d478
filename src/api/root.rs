use axum::response::Html;

static INDEX: &str = include_str!("../../static/index.html");

pub(crate) async fn get() -> Html<&'static str> {
    Html(INDEX)
}
