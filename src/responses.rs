//! Response Envelope
//!
//! Every non-binary response leaves the service as
//! `{"status": ..., "message": ..., "data": ...}` with `data` omitted when
//! absent. [`DataOnly`] skips the envelope and sends the payload as the body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    pub status: Status,
    pub message: String,
    pub code: StatusCode,
    pub data: Option<serde_json::Value>,
    /// Whether [`Envelope::log`] emits anything.
    pub verbose: bool,
}

#[derive(Serialize)]
struct WireEnvelope<'a> {
    status: Status,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a serde_json::Value>,
}

impl Envelope {
    pub fn new(status: Status, message: impl Into<String>, code: StatusCode) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            data: None,
            verbose: true,
        }
    }

    pub fn success(message: impl Into<String>, code: StatusCode) -> Self {
        Self::new(Status::Success, message, code)
    }

    pub fn warning(message: impl Into<String>, code: StatusCode) -> Self {
        Self::new(Status::Warning, message, code)
    }

    pub fn error(message: impl Into<String>, code: StatusCode) -> Self {
        Self::new(Status::Error, message, code)
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    /// Logs the message at a level derived from the HTTP code
    pub fn log(&self) {
        if !self.verbose {
            return;
        }
        match self.code.as_u16() {
            code if code < 400 => info!(code, "{}", self.message),
            code if code < 500 => warn!(code, "{}", self.message),
            code => error!(code, "{}", self.message),
        }
    }

    pub fn to_wire(&self) -> (StatusCode, serde_json::Value) {
        let body = WireEnvelope {
            status: self.status,
            message: &self.message,
            data: self.data.as_ref(),
        };
        // WireEnvelope holds only strings and JSON values
        let body = serde_json::to_value(body).unwrap_or(serde_json::Value::Null);
        (self.code, body)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        self.log();
        let (code, body) = self.to_wire();
        (code, Json(body)).into_response()
    }
}

/// Serializes `data` as the whole body, without the envelope and without logging.
#[derive(Debug)]
pub struct DataOnly<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for DataOnly<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format_omits_missing_data() {
        let (code, body) = Envelope::success("The REST-API is up and running", StatusCode::OK).to_wire();
        assert_eq!(code, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "success", "message": "The REST-API is up and running"})
        );
    }

    #[test]
    fn test_wire_format_with_data() {
        let envelope = Envelope::warning("Missing fields!", StatusCode::BAD_REQUEST)
            .with_data(json!(["files[]"]));
        let (code, body) = envelope.to_wire();
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "warning");
        assert_eq!(body["data"], json!(["files[]"]));
    }

    #[test]
    fn test_quiet_envelope() {
        let envelope = Envelope::error("Unauthorized", StatusCode::FORBIDDEN).quiet();
        assert!(!envelope.verbose);
        assert_eq!(envelope.status, Status::Error);
    }

    #[tokio::test]
    async fn test_data_only_body() {
        let response = DataOnly(StatusCode::OK, json!({"filename": "test.txt"})).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"filename": "test.txt"}));
    }
}
