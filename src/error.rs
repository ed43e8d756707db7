// In: src/error.rs

//! This module defines the single, unified error type for the flight-frame library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Only a handful of conditions ever cross the transcoding boundary. Null cells,
//! unrecognised value kinds and schema/batch disagreements are absorbed by the
//! transcoder and never surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscodeError {
    // =========================================================================
    // === High-Level, Semantic Errors
    // =========================================================================
    /// The caller cancelled the transcode while batches were still being pulled.
    #[error("transcode cancelled before the batch stream was exhausted")]
    Cancelled,

    /// The external query collaborator failed to run the statement.
    #[error("query execution failed: {0}")]
    Execution(String),

    /// The query model was malformed or carried no SQL.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("logger initialisation failed: {0}")]
    Logging(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// A transport or protocol failure reported by the batch stream.
    #[error("error reading records: {0}")]
    StreamRead(#[from] arrow::error::ArrowError),

    /// An error from the Serde JSON library, typically while parsing settings or a query model.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl TranscodeError {
    /// Returns `true` if the error came from the batch stream itself.
    pub fn is_stream_error(&self) -> bool {
        matches!(self, TranscodeError::StreamRead(_))
    }
}
