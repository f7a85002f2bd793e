//! Error types for a transfer run
//!
//! Each stage of a run fails with exactly one kind of error. The message
//! is whatever the collaborator (S3, MySQL, Glue, the CSV parser) reported,
//! so operators see the service's own wording.

use thiserror::Error;

/// Result type alias for transfer stages
pub type Result<T> = std::result::Result<T, TransferError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The source object could not be fetched or is not well-formed CSV
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// The primary database append failed
    #[error("Database write failed: {0}")]
    SinkWrite(String),

    /// The fallback catalog table could not be registered
    #[error("Catalog registration failed: {0}")]
    CatalogRegistration(String),
}

impl TransferError {
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    pub fn sink_write(msg: impl Into<String>) -> Self {
        Self::SinkWrite(msg.into())
    }

    pub fn catalog_registration(msg: impl Into<String>) -> Self {
        Self::CatalogRegistration(msg.into())
    }

    /// The collaborator's message without the stage prefix
    pub fn message(&self) -> &str {
        match self {
            TransferError::SourceUnavailable(msg)
            | TransferError::SinkWrite(msg)
            | TransferError::CatalogRegistration(msg) => msg,
        }
    }
}

impl From<csv::Error> for TransferError {
    fn from(err: csv::Error) -> Self {
        TransferError::SourceUnavailable(format!("malformed CSV: {}", err))
    }
}

impl From<sqlx::Error> for TransferError {
    fn from(err: sqlx::Error) -> Self {
        TransferError::SinkWrite(err.to_string())
    }
}
