//! API Routes
//!
//! - `/`, `/alive` - liveness checks
//! - `/storage/v1/file/...` - file storage
//!
//! Every route sits behind the API key middleware; whether a key is actually
//! demanded depends on the method and the auth toggles.

pub mod alive;
pub mod extract;
pub mod files;

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, middleware::from_fn_with_state, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::{cors_layer, require_api_key};
use crate::models::AppState;

/// One registered route, as listed by the `urls` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: &'static str,
    pub rule: &'static str,
    pub endpoint: &'static str,
}

pub const ROUTES: &[RouteInfo] = &[
    RouteInfo { method: "GET", rule: "/", endpoint: "alive.index" },
    RouteInfo { method: "GET", rule: "/alive", endpoint: "alive.alive_page" },
    RouteInfo { method: "POST", rule: "/storage/v1/file", endpoint: "files.create_file" },
    RouteInfo { method: "PUT", rule: "/storage/v1/file/{filename}", endpoint: "files.update_file" },
    RouteInfo { method: "GET", rule: "/storage/v1/file/{filename}", endpoint: "files.read_file" },
    RouteInfo { method: "DELETE", rule: "/storage/v1/file/{filename}", endpoint: "files.delete_file" },
    RouteInfo {
        method: "GET",
        rule: "/storage/v1/file/download/{filename}",
        endpoint: "files.download_file",
    },
];

/// Create the main application router
pub fn create_router(state: AppState) -> Result<Router> {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server)?;
    let body_limit = state.config.server.max_upload_bytes;

    let router = Router::new()
        .merge(alive::router())
        .merge(files::router())
        .route_layer(from_fn_with_state(state.clone(), require_api_key))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state);

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_server;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_every_listed_get_route_is_served() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("sample.txt"), b"sample").unwrap();
        let server = create_test_server(temp_dir.path(), &[]);

        for route in ROUTES.iter().filter(|r| r.method == "GET") {
            let path = route.rule.replace("{filename}", "sample.txt");
            server.get(&path).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let temp_dir = TempDir::new().unwrap();
        let server = create_test_server(temp_dir.path(), &[]);

        server.get("/storage/v2/file").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_cors_preflight_in_development() {
        let temp_dir = TempDir::new().unwrap();
        let server = create_test_server(
            temp_dir.path(),
            &[("FILE_MANAGER_EXECUTION_MODE", "development")],
        );

        let response = server
            .method(axum::http::Method::OPTIONS, "/storage/v1/file")
            .add_header("Origin", "http://elsewhere.example")
            .add_header("Access-Control-Request-Method", "POST")
            .await;

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }
}
