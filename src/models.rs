use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::middleware::AuthGate;
use crate::storage::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<FileStore>,
    pub auth: Arc<AuthGate>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = FileStore::from_config(&config.storage);
        let auth = AuthGate::new(config.auth.clone());
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            auth: Arc::new(auth),
        }
    }
}

/// One `files[]` entry of a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Metadata of a file written to the store, returned to the uploader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// Name the client sent
    pub name: String,
    /// Name on disk
    pub filename: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Result of storing a batch: a lone object for one file, a list otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StoreOutcome {
    Single(StoredFile),
    Many(Vec<StoredFile>),
}

impl StoreOutcome {
    pub fn filenames(&self) -> Vec<&str> {
        match self {
            StoreOutcome::Single(file) => vec![file.filename.as_str()],
            StoreOutcome::Many(files) => files.iter().map(|f| f.filename.as_str()).collect(),
        }
    }
}
