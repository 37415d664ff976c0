//! API key gate
//!
//! A single shared secret, checked per request. Reads (`GET`) and writes
//! (everything else) are toggled independently, so a deployment can serve
//! public downloads while still requiring the key for uploads.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::config::AuthConfig;
use crate::models::AppState;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AuthGate {
    config: AuthConfig,
}

impl AuthGate {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn requires_auth(&self, method: &Method) -> bool {
        if !self.is_enabled() {
            return false;
        }
        if method == Method::GET {
            self.config.auth_outgoing
        } else {
            self.config.auth_incoming
        }
    }

    pub fn authenticate(&self, method: &Method, headers: &HeaderMap) -> AppResult<()> {
        if !self.requires_auth(method) {
            return Ok(());
        }
        let Some(expected) = self.config.api_key.as_deref() else {
            return Ok(());
        };

        let provided = headers
            .get(self.config.api_key_header.as_str())
            .ok_or(AppError::AuthHeaderMissing)?;

        if !constant_time_compare(provided.as_bytes(), expected.as_bytes()) {
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }
}

/// Rejects the request before it reaches a handler when the key is required and wrong
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.auth.authenticate(req.method(), req.headers())?;
    debug!(method = %req.method(), path = %req.uri().path(), "Request authorized");
    Ok(next.run(req).await)
}

/// Compares two byte slices without short-circuiting on the first difference
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
