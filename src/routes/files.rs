//! File routes
//!
//! - `POST /storage/v1/file` - store uploaded file(s)
//! - `PUT /storage/v1/file/{filename}` - replace a file with new upload(s)
//! - `GET /storage/v1/file/{filename}` - return a file inline
//! - `DELETE /storage/v1/file/{filename}` - delete a file
//! - `GET /storage/v1/file/download/{filename}` - return a file as an attachment

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::info;

use super::extract::{UniqueId, UploadedFiles};
use crate::models::{AppState, StoreOutcome};
use crate::naming::is_plain_filename;
use crate::responses::{DataOnly, Envelope};
use crate::types::{AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/storage/v1/file", post(create_file))
        .route(
            "/storage/v1/file/{filename}",
            get(read_file).put(update_file).delete(delete_file),
        )
        .route("/storage/v1/file/download/{filename}", get(download_file))
}

#[derive(Debug, Clone, Copy)]
enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    fn as_str(self) -> &'static str {
        match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        }
    }
}

/// Path parameters must name a file directly under the store root
fn stored_name(filename: String) -> AppResult<String> {
    if is_plain_filename(&filename) {
        Ok(filename)
    } else {
        Err(AppError::NotFound(filename))
    }
}

async fn create_file(
    State(state): State<AppState>,
    UniqueId(unique_id): UniqueId,
    UploadedFiles(files): UploadedFiles,
) -> AppResult<DataOnly<StoreOutcome>> {
    info!(count = files.len(), unique_id, "Request to store file(s)");
    let outcome = state
        .store
        .store_files(&files, unique_id)
        .await
        .map_err(|e| e.during("store"))?;
    Ok(DataOnly(StatusCode::OK, outcome))
}

async fn update_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    UniqueId(unique_id): UniqueId,
    UploadedFiles(files): UploadedFiles,
) -> AppResult<DataOnly<StoreOutcome>> {
    let filename = stored_name(filename)?;
    info!(filename = %filename, count = files.len(), unique_id, "Request to update file(s)");
    let outcome = state
        .store
        .update(&filename, &files, unique_id)
        .await
        .map_err(|e| e.during("update"))?;
    Ok(DataOnly(StatusCode::OK, outcome))
}

async fn read_file(State(state): State<AppState>, Path(filename): Path<String>) -> AppResult<Response> {
    info!(filename = %filename, "Request to get file");
    send_file(&state, filename, Disposition::Inline).await
}

async fn delete_file(State(state): State<AppState>, Path(filename): Path<String>) -> AppResult<Envelope> {
    info!(filename = %filename, "Request to delete file");
    let filename = stored_name(filename)?;
    if state.store.remove(&filename).await? {
        Ok(Envelope::success(format!("File '{filename}' deleted"), StatusCode::OK))
    } else {
        Err(AppError::NotFound(filename))
    }
}

async fn download_file(State(state): State<AppState>, Path(filename): Path<String>) -> AppResult<Response> {
    info!(filename = %filename, "Request to download file");
    send_file(&state, filename, Disposition::Attachment).await
}

async fn send_file(state: &AppState, filename: String, disposition: Disposition) -> AppResult<Response> {
    let filename = stored_name(filename)?;
    let content = state.store.read(&filename).await?;
    info!(filename = %filename, size = content.len(), "File retrieved");

    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();
    let content_disposition = format!(
        "{}; filename=\"{}\"",
        disposition.as_str(),
        filename.replace('"', "\\\"")
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        content,
    )
        .into_response())
}
