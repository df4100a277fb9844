// Résumé ingestion pipeline.
// Per-format acquisition → link classification ∥ section segmentation → entity extraction.
// LaTeX sources skip the line-based stages and go through their own structural extractor.
// Document parsing is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod acquire;
pub mod dispatch;
pub mod docx_source;
pub mod extract;
pub mod handlers;
pub mod json_import;
pub mod latex;
pub mod linkedin;
pub mod links;
pub mod merge;
pub mod patterns;
pub mod pdf_source;
pub mod sections;

use thiserror::Error;

pub use dispatch::{parse_resume_file, FileFormat, IngestOptions};

/// Failure taxonomy for a single ingestion attempt. Nothing here is retried.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type: .{0}. Supported formats: PDF, DOCX, TXT, LaTeX, JSON.")]
    UnsupportedFormat(String),

    #[error("{0}")]
    EmptyExtraction(String),

    #[error("Invalid JSON format: {0}")]
    InvalidFormat(String),

    #[error(
        "Failed to parse .{ext} file: {reason}. Try saving the file in a different format (e.g., plain text or JSON)."
    )]
    ExtractionFailure { ext: String, reason: String },

    /// JSON snapshots are not parsed heuristically; the caller runs the JSON import instead.
    #[error("JSON files are imported through the JSON import path")]
    JsonPassthrough,

    #[error("The file appears to be empty.")]
    EmptyFile,

    #[error("File is too large ({size} bytes, max {limit} bytes). Please use a smaller file.")]
    FileTooLarge { size: usize, limit: usize },
}

impl IngestError {
    pub fn extraction(ext: &str, reason: impl std::fmt::Display) -> Self {
        IngestError::ExtractionFailure {
            ext: ext.to_string(),
            reason: reason.to_string(),
        }
    }
}
