use poem::{handler, IntoResponse};

const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

#[handler]
pub async fn get_theme_css() -> impl IntoResponse {
    include_bytes!("static/theme.css")
        .with_content_type("text/css")
        .with_header("Cache-Control", CACHE_CONTROL)
}
