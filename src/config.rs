use anyhow::{Context, Result};
use axum::http::HeaderName;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const ENV_PREFIX: &str = "FILE_MANAGER_";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Production,
    Development,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Production => write!(f, "production"),
            ExecutionMode::Development => write!(f, "development"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub mode: ExecutionMode,
    pub port: u16,
    pub host: String,
    /// Public host of the deployment; drives the CORS whitelist in production
    pub server_url: Option<String>,
    pub max_upload_bytes: usize,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub files_dir: PathBuf,
    pub allowed_extensions: Option<BTreeSet<String>>,
    /// Append a UTC timestamp to hash-derived filenames
    pub unique_timestamp: bool,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub api_key: Option<String>,
    pub api_key_header: String,
    pub auth_incoming: bool,
    pub auth_outgoing: bool,
}

// Keeps the secret out of startup logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_key_header", &self.api_key_header)
            .field("auth_incoming", &self.auth_incoming)
            .field("auth_outgoing", &self.auth_outgoing)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_header: "X-Api-Key".to_string(),
            auth_incoming: true,
            auth_outgoing: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Keys are given without
    /// the `FILE_MANAGER_` prefix.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(&format!("{ENV_PREFIX}{key}"));

        let api_key_header = var("API_KEY_HEADER").unwrap_or_else(|| "X-Api-Key".to_string());
        HeaderName::from_str(&api_key_header)
            .with_context(|| format!("{ENV_PREFIX}API_KEY_HEADER must be a valid header name"))?;

        let mode = match var("EXECUTION_MODE").as_deref() {
            None | Some("production") => ExecutionMode::Production,
            Some(_) => ExecutionMode::Development,
        };

        Ok(Self {
            server: ServerConfig {
                mode,
                port: var("PORT")
                    .unwrap_or_else(|| "8000".to_string())
                    .parse()
                    .with_context(|| format!("{ENV_PREFIX}PORT must be a port number"))?,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                server_url: var("SERVER_URL").filter(|s| !s.trim().is_empty()),
                max_upload_bytes: match var("MAX_UPLOAD_BYTES") {
                    Some(raw) => raw
                        .parse()
                        .with_context(|| format!("{ENV_PREFIX}MAX_UPLOAD_BYTES must be a byte count"))?,
                    None => DEFAULT_MAX_UPLOAD_BYTES,
                },
                log_dir: var("LOG_DIR").filter(|s| !s.is_empty()).map(PathBuf::from),
            },
            storage: StorageConfig {
                files_dir: var("FILES_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("files")),
                allowed_extensions: var("ALLOWED_EXTENSIONS").and_then(|raw| parse_list(&raw)),
                unique_timestamp: var("UNIQUE_TIMESTAMP").map(|v| is_truthy(&v)).unwrap_or(false),
            },
            auth: AuthConfig {
                api_key: var("API_KEY").filter(|k| !k.is_empty()),
                api_key_header,
                auth_incoming: var("AUTH_INCOMING").map(|v| is_truthy(&v)).unwrap_or(true),
                auth_outgoing: var("AUTH_OUTGOING").map(|v| !is_falsy(&v)).unwrap_or(false),
            },
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

fn is_falsy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "false" | "0" | "no" | "off")
}

fn parse_list(raw: &str) -> Option<BTreeSet<String>> {
    let items: BTreeSet<String> = raw
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
