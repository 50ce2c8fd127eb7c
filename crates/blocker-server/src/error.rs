use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use blocker_store::StoreError;

/// Response header carrying the machine-readable error code.
pub const ERROR_CODE_HEADER: &str = "x-blocker-error";

/// Failures of a single ingest or retrieval request.
///
/// Every variant is terminal for its request. Each maps to a distinct
/// [`code`](BlobError::code) so client misuse can be told apart from
/// storage faults without parsing messages.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("must provide a key")]
    MissingKey,

    #[error("blob must contain at least one byte")]
    EmptyBlob,

    #[error("blob exceeds maximum size of {max} bytes")]
    PayloadTooLarge { max: usize },

    #[error("key not found: {0}")]
    NotFound(String),

    /// Stored bytes do not hash to the key they were filed under.
    #[error("data corrupted in storage: {key} hashes to {computed}")]
    Integrity { key: String, computed: String },

    #[error("storage error: {0}")]
    Storage(#[source] StoreError),

    #[error("failed to read request body: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BlobError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingKey | Self::EmptyBlob => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Integrity { .. }
            | Self::Storage(_)
            | Self::Transport(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable identifier sent in the [`ERROR_CODE_HEADER`] header.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingKey => "missing_key",
            Self::EmptyBlob => "empty_blob",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::NotFound(_) => "not_found",
            Self::Integrity { .. } => "integrity",
            Self::Storage(_) => "storage",
            Self::Transport(_) => "transport",
            Self::Internal(_) => "internal",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for BlobError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
        }
        (self.status(), [(ERROR_CODE_HEADER, self.code())], self.to_string()).into_response()
    }
}

pub type BlobResult<T> = Result<T, BlobError>;

/// Errors starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
