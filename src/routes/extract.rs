//! Request validation extractors
//!
//! Handlers receive already-validated inputs: the `unique_id` naming flag and
//! the non-empty list of uploaded files. The API key is checked earlier by
//! [`crate::middleware::require_api_key`].

use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Query, Request},
    http::request::Parts,
};
use serde::Deserialize;
use std::convert::Infallible;
use tracing::warn;

use crate::models::UploadedFile;
use crate::types::AppError;

/// Multipart field carrying the uploads
pub const FILES_FIELD: &str = "files[]";

#[derive(Debug, Deserialize)]
struct UniqueIdParams {
    unique_id: Option<String>,
}

/// `?unique_id=true` (any case) selects hash naming; anything else keeps the client name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueId(pub bool);

impl UniqueId {
    pub fn parse(raw: Option<&str>) -> Self {
        UniqueId(raw.is_some_and(|v| v.eq_ignore_ascii_case("true")))
    }
}

impl<S> FromRequestParts<S> for UniqueId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = Query::<UniqueIdParams>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(params)| params.unique_id);
        Ok(UniqueId::parse(raw.as_deref()))
    }
}

/// Every `files[]` part with a non-empty filename, in request order
#[derive(Debug)]
pub struct UploadedFiles(pub Vec<UploadedFile>);

impl<S> FromRequest<S> for UploadedFiles
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await.map_err(|rejection| {
            warn!(error = %rejection, "Upload is not a multipart form");
            AppError::NoFilesProvided
        })?;

        let mut files = Vec::new();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(FILES_FIELD) {
                continue;
            }
            let file_name = match field.file_name() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => continue,
            };
            let content_type = field.content_type().map(str::to_string);
            let content = field.bytes().await.map_err(multipart_error)?;
            files.push(UploadedFile::new(file_name, content_type, content));
        }

        if files.is_empty() {
            return Err(AppError::NoFilesProvided);
        }
        Ok(UploadedFiles(files))
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Upload {
        code: err.status(),
        message: err.body_text(),
    }
}
