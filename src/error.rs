use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across the crate.
pub type CodebookResult<T> = Result<T, CodebookError>;

/// Error type returned by document reading, table ingestion, codebook persistence and decoding.
///
/// Extraction itself never fails: lines that match no pattern are skipped. Everything here comes
/// from the file boundary or from asking for a column/variable that does not exist.
#[derive(Debug, Error)]
pub enum CodebookError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited table read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Codebook JSON could not be serialized or deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "pdf")]
    /// PDF text extraction failed (feature-gated behind `pdf`).
    #[error("pdf error: {0}")]
    Pdf(String),

    /// The table does not have the requested column(s).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be parsed into the requested [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A decode plan names a variable that the codebook does not define.
    #[error("variable '{name}' is not defined in the codebook")]
    UnknownVariable { name: String },

    /// The document path has an extension no page source understands.
    #[error("unsupported document format: {}", path.display())]
    UnsupportedDocument { path: PathBuf },
}
