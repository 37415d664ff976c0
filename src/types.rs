// Error taxonomy shared by the naming policy, the store and the auth gate

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::responses::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No files are given")]
    NoFilesProvided,

    #[error("File has no valid extension")]
    InvalidExtension,

    #[error("Invalid filename")]
    InvalidFilename,

    #[error("Unsafe filename")]
    UnsafeFilename,

    #[error("Unexpected file extension '{0}'")]
    UnexpectedExtension(String),

    #[error("Auth Not Found!")]
    AuthHeaderMissing,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("File '{0}' not found")]
    NotFound(String),

    /// The multipart body could not be read (size limit, truncated stream)
    #[error("{message}")]
    Upload { code: StatusCode, message: String },

    /// Filesystem failure. Only `operation` reaches the client.
    #[error("Failed to {operation} the file!")]
    Storage {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The naming policy refused an upload. Only `operation` reaches the client.
    #[error("Failed to {operation} the file!")]
    Rejected {
        operation: &'static str,
        #[source]
        reason: Box<AppError>,
    },
}

impl AppError {
    pub fn storage(operation: &'static str, source: std::io::Error) -> Self {
        AppError::Storage { operation, source }
    }

    /// Re-labels a storage failure with the operation the route was performing.
    /// Naming failures are folded into the same generic message.
    pub fn during(self, operation: &'static str) -> Self {
        match self {
            AppError::Storage { source, .. } => AppError::Storage { operation, source },
            AppError::Rejected { reason, .. } => AppError::Rejected { operation, reason },
            naming if naming.is_naming() => AppError::Rejected {
                operation,
                reason: Box::new(naming),
            },
            other => other,
        }
    }

    fn is_naming(&self) -> bool {
        matches!(
            self,
            AppError::InvalidExtension
                | AppError::InvalidFilename
                | AppError::UnsafeFilename
                | AppError::UnexpectedExtension(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoFilesProvided => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidExtension
            | AppError::InvalidFilename
            | AppError::UnsafeFilename
            | AppError::UnexpectedExtension(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::AuthHeaderMissing => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upload { code, .. } => *code,
            AppError::Storage { .. } | AppError::Rejected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope shape of this error. Auth failures are not logged.
    pub fn to_envelope(&self) -> Envelope {
        let message = self.to_string();
        let code = self.status_code();
        match self {
            AppError::AuthHeaderMissing => Envelope::warning(message, code).quiet(),
            AppError::Unauthorized => Envelope::error(message, code).quiet(),
            AppError::NotFound(_) | AppError::Upload { .. } => Envelope::warning(message, code),
            _ => Envelope::error(message, code),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Storage { operation, source } => {
                error!(operation = *operation, error = ?source, "Storage failure");
            }
            AppError::Rejected { operation, reason } => {
                warn!(operation = *operation, reason = %reason, "Upload rejected by naming policy");
            }
            _ => {}
        }
        self.to_envelope().into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
