//! Request failures and their HTTP rendering.
//!
//! Every failure is terminal for its request and rendered as a status code
//! plus a short plain-text body. Internal detail goes to the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use sbe_core::{PathStage, SbeError};
use sbe_vault::VaultError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("multipart body has no `file` field")]
    NoFilePart,

    #[error("uploaded file has an empty name")]
    NoSelectedFile,

    #[error("file type not allowed: {0}")]
    FileTypeNotAllowed(String),

    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("storing upload failed: {0}")]
    Store(#[source] VaultError),

    #[error("reading file failed: {0}")]
    Read(#[source] VaultError),

    #[error("parsing file failed: {0}")]
    Parse(#[source] SbeError),

    #[error("writing file failed: {0}")]
    Write(#[source] VaultError),

    #[error("{0} missing from document")]
    Missing(PathStage),

    #[error("no stored file named {0}")]
    FileNotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFilePart
            | Self::NoSelectedFile
            | Self::FileTypeNotAllowed(_)
            | Self::InvalidName(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Missing(_) | Self::FileNotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Read(_) | Self::Parse(_) | Self::Write(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The plain-text body sent to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::NoFilePart => "No file part".to_string(),
            Self::NoSelectedFile => "No selected file".to_string(),
            Self::FileTypeNotAllowed(_) => "File type not allowed".to_string(),
            Self::InvalidName(_) => "Invalid file name".to_string(),
            Self::BadRequest(detail) => detail.clone(),
            Self::Store(_) => "Error saving the uploaded file.".to_string(),
            Self::Read(_) => "Error reading the JSON file.".to_string(),
            Self::Parse(_) => "Error parsing the JSON file.".to_string(),
            Self::Write(_) => "Error writing the updated JSON file.".to_string(),
            Self::Missing(stage) => format!("{stage} not found."),
            Self::FileNotFound(_) => "File not found.".to_string(),
            Self::Internal(_) => "Internal server error.".to_string(),
        }
    }

    /// Classify a document-level failure.
    pub fn from_document(err: SbeError) -> Self {
        match err {
            SbeError::NotFound(stage) => Self::Missing(stage),
            SbeError::Parse(_) => Self::Parse(err),
            SbeError::Serialization(detail) => Self::Internal(detail),
        }
    }

    /// Classify a failure while rewriting the record. A document without the
    /// fixed path cannot take the assignment, which is reported the same way
    /// as unparsable content.
    pub fn from_update(err: SbeError) -> Self {
        match err {
            SbeError::NotFound(_) => Self::Parse(err),
            other => Self::from_document(other),
        }
    }
}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::InvalidName(name) => Self::InvalidName(name),
            other => Self::Read(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, self.public_message()).into_response()
    }
}
