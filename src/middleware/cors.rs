// CORS configuration
// Production deployments with a known public URL only accept that origin;
// everything else falls back to any origin.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{ExecutionMode, ServerConfig};

/// Origins accepted by the service, `None` meaning any
pub fn allowed_origins(config: &ServerConfig) -> Option<Vec<String>> {
    match (config.mode, config.server_url.as_deref()) {
        (ExecutionMode::Production, Some(url)) => {
            Some(vec![format!("http://{url}"), format!("https://{url}")])
        }
        _ => None,
    }
}

pub fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    let origin = match allowed_origins(config) {
        Some(origins) => {
            let values = origins
                .iter()
                .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {o}")))
                .collect::<Result<Vec<_>>>()?;
            AllowOrigin::list(values)
        }
        None => AllowOrigin::from(Any),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(mode: ExecutionMode, server_url: Option<&str>) -> ServerConfig {
        ServerConfig {
            mode,
            port: 8000,
            host: "0.0.0.0".to_string(),
            server_url: server_url.map(str::to_string),
            max_upload_bytes: 1024,
            log_dir: None,
        }
    }

    #[test]
    fn test_production_with_url_whitelists_both_schemes() {
        let origins = allowed_origins(&server(ExecutionMode::Production, Some("files.example.com")));
        assert_eq!(
            origins,
            Some(vec![
                "http://files.example.com".to_string(),
                "https://files.example.com".to_string()
            ])
        );
    }

    #[test]
    fn test_wildcard_otherwise() {
        assert!(allowed_origins(&server(ExecutionMode::Production, None)).is_none());
        assert!(allowed_origins(&server(ExecutionMode::Development, Some("files.example.com"))).is_none());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let config = server(ExecutionMode::Production, Some("bad\nhost"));
        assert!(cors_layer(&config).is_err());
    }
}
