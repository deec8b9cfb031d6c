//! The browser form served at `/`.
//!
//! A single static page. View state moves
//! `Idle -> FileSelected -> Uploaded -> Editing -> Submitted`; a failed
//! request drops back to the previous state and shows an alert.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_targets_every_endpoint() {
        for endpoint in ["/upload", "/update-substrate1", "/download-updated-json/"] {
            assert!(INDEX_HTML.contains(endpoint), "form never calls {endpoint}");
        }
    }

    #[test]
    fn page_binds_both_editable_fields() {
        assert!(INDEX_HTML.contains(r#"name="thickness""#));
        assert!(INDEX_HTML.contains(r#"name="material""#));
    }
}
