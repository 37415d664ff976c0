// File Manager - HTTP file storage with hash-based naming and API-key auth

pub mod commands;
pub mod config;
pub mod middleware;
pub mod models;
pub mod naming;
pub mod responses;
pub mod routes;
pub mod storage;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> anyhow::Result<axum::Router> {
    routes::create_router(state)
}
