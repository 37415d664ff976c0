// Storage layer (local filesystem)

pub mod filesystem;

pub use filesystem::*;

use tracing::{info, warn};

use crate::models::{StoreOutcome, StoredFile, UploadedFile};
use crate::types::{AppError, AppResult};

impl FileStore {
    /// Name a single upload with the naming policy and write it
    pub async fn store_file(&self, file: &UploadedFile, unique_id: bool) -> AppResult<StoredFile> {
        let filename = self.naming().compute_filename(file, unique_id)?;
        self.save(&filename, &file.content).await?;

        info!(name = %file.file_name, filename = %filename, size = file.size(), "File stored");
        Ok(StoredFile {
            name: file.file_name.clone(),
            filename,
            content_type: file.content_type.clone(),
            size: file.size(),
            hash: unique_id.then(|| crate::naming::content_hash(&file.content)),
        })
    }

    /// Store a batch in input order. The first failure aborts the rest.
    pub async fn store_files(&self, files: &[UploadedFile], unique_id: bool) -> AppResult<StoreOutcome> {
        match files {
            [] => Err(AppError::NoFilesProvided),
            [file] => Ok(StoreOutcome::Single(self.store_file(file, unique_id).await?)),
            _ => {
                let mut stored = Vec::with_capacity(files.len());
                for file in files {
                    stored.push(self.store_file(file, unique_id).await?);
                }
                Ok(StoreOutcome::Many(stored))
            }
        }
    }

    /// Drop `target` (if present) and store the replacement batch.
    ///
    /// The two steps are not atomic: if storing fails, `target` is already gone.
    pub async fn update(
        &self,
        target: &str,
        files: &[UploadedFile],
        unique_id: bool,
    ) -> AppResult<StoreOutcome> {
        if files.is_empty() {
            return Err(AppError::NoFilesProvided);
        }
        if !self.remove(target).await? {
            warn!(filename = target, "Update target did not exist");
        }
        self.store_files(files, unique_id).await
    }
}
