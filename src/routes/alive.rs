//! Liveness endpoints
//!
//! - `GET /` - JSON envelope confirming the REST-API is up
//! - `GET /alive` - small HTML page naming the host that answered

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::Html,
    routing::get,
    Router,
};
use tracing::info;

use crate::models::AppState;
use crate::responses::Envelope;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/alive", get(alive_page))
}

async fn index() -> Envelope {
    info!("Alive request");
    Envelope::success("The REST-API is up and running", StatusCode::OK)
}

async fn alive_page(headers: HeaderMap) -> Html<String> {
    info!("Alive Server request");
    let base_url = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{host}/"))
        .unwrap_or_else(|| "...".to_string());

    Html(render_alive_page("Server", "is running under", &base_url))
}

fn render_alive_page(mode: &str, message: &str, status: &str) -> String {
    let status = escape_html(status);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>File Manager - {mode}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 640px;
            margin: 80px auto;
            color: #2d2d2d;
            text-align: center;
        }}
        .status {{
            background: #e8f7ef;
            border-left: 4px solid #1f9d55;
            border-radius: 8px;
            padding: 20px;
        }}
        code {{ background: #f1f1f1; padding: 2px 8px; border-radius: 4px; }}
    </style>
</head>
<body>
    <h1>File Manager</h1>
    <div class="status">
        <p>{mode} {message} <code>{status}</code></p>
    </div>
</body>
</html>"#
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_server;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_index_returns_envelope() {
        let temp_dir = TempDir::new().unwrap();
        let server = create_test_server(temp_dir.path(), &[]);

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_json(&serde_json::json!({
            "status": "success",
            "message": "The REST-API is up and running"
        }));
    }

    #[tokio::test]
    async fn test_alive_page_is_html() {
        let temp_dir = TempDir::new().unwrap();
        let server = create_test_server(temp_dir.path(), &[]);

        let response = server.get("/alive").await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("<!DOCTYPE html>"));
        assert!(text.contains("Server is running under"));
    }

    #[tokio::test]
    async fn test_alive_requires_key_when_outgoing_locked() {
        let temp_dir = TempDir::new().unwrap();
        let server = create_test_server(
            temp_dir.path(),
            &[("FILE_MANAGER_API_KEY", "secret"), ("FILE_MANAGER_AUTH_OUTGOING", "true")],
        );

        server.get("/alive").await.assert_status_unauthorized();
        server
            .get("/alive")
            .add_header("X-Api-Key", "secret")
            .await
            .assert_status_ok();
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
