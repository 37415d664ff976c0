//! File naming policy
//!
//! Decides the on-disk name of an upload. In unique-ID mode the name is the
//! SHA-256 of the content (plus an optional UTC timestamp) followed by the
//! original extension; otherwise it is the sanitized client filename.

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::config::StorageConfig;
use crate::models::UploadedFile;
use crate::types::{AppError, AppResult};

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, Default)]
pub struct NamingPolicy {
    pub timestamp: bool,
    pub allowed_extensions: Option<BTreeSet<String>>,
}

impl NamingPolicy {
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            timestamp: config.unique_timestamp,
            allowed_extensions: config.allowed_extensions.clone(),
        }
    }

    /// Derive the stored filename for `file`
    pub fn compute_filename(&self, file: &UploadedFile, unique_id: bool) -> AppResult<String> {
        let filename = if unique_id {
            let extension = file_extension(&file.file_name)?;
            let suffix = if self.timestamp {
                format!("_{}", now())
            } else {
                String::new()
            };
            format!("{}{}.{}", content_hash(&file.content), suffix, extension)
        } else {
            sanitize_filename(&file.file_name)?
        };

        if let Some(allowed) = &self.allowed_extensions {
            let extension = file_extension(&filename)?;
            if !allowed.contains(extension) {
                return Err(AppError::UnexpectedExtension(extension.to_string()));
            }
        }

        Ok(filename)
    }
}

/// Current UTC time, e.g. `20240131T235959`
pub fn now() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Lowercase hex SHA-256 of `content`
pub fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Extension of the basename of `filename`, which must contain exactly one `.`
pub fn file_extension(filename: &str) -> AppResult<&str> {
    let basename = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let mut parts = basename.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(extension), None) => Ok(extension),
        _ => Err(AppError::InvalidExtension),
    }
}

/// Reduce a client-supplied name to something safe to join under the store root.
///
/// Accented letters are decomposed to their ASCII base first. Path separators
/// become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are
/// trimmed, so `../../etc/passwd` turns into `etc_passwd`.
pub fn sanitize_filename(filename: &str) -> AppResult<String> {
    if filename.chars().any(|c| c.is_control()) {
        return Err(AppError::UnsafeFilename);
    }

    let spaced: String = filename
        .nfkd()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return Err(AppError::InvalidFilename);
    }
    Ok(trimmed.to_string())
}

/// Whether a path parameter names a file directly inside the store root
pub fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\', '\0'])
}
