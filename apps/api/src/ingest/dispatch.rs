//! Format selection and error normalisation for one ingestion attempt.

use serde::Serialize;
use tracing::{error, info};

use crate::ingest::acquire::{
    acquire_docx, acquire_pdf, acquire_plain, DocxTextSource, PdfTextSource,
    DEFAULT_LINE_TOLERANCE,
};
use crate::ingest::extract::parse_resume_text;
use crate::ingest::latex::parse_latex_resume;
use crate::ingest::IngestError;
use crate::models::resume::PartialResumeData;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Detected input format, chosen purely from the lower-cased file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Pdf,
    /// `.docx`, and legacy `.doc` which fails in acquisition with a re-save hint.
    Docx,
    Latex,
    PlainText,
    Json,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Result<Self, IngestError> {
        match ext {
            "pdf" => Ok(FileFormat::Pdf),
            "docx" | "doc" => Ok(FileFormat::Docx),
            "tex" | "latex" => Ok(FileFormat::Latex),
            "txt" => Ok(FileFormat::PlainText),
            "json" => Ok(FileFormat::Json),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_filename(filename: &str) -> Result<Self, IngestError> {
        Self::from_extension(&extension_of(filename))
    }
}

/// Text after the last `.`, lower-cased. A name without a dot is its own extension.
pub fn extension_of(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Tunables for one ingestion call, derived from `Config`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestOptions {
    pub max_bytes: usize,
    pub line_tolerance: f32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            line_tolerance: DEFAULT_LINE_TOLERANCE,
        }
    }
}

/// Parses one uploaded file into a partial résumé.
///
/// Size and emptiness are checked before the extension is looked at. `.json` is
/// refused with `JsonPassthrough` so the caller can run the full JSON import.
/// Collaborator failures come back as `ExtractionFailure` naming the real extension.
pub async fn parse_resume_file(
    filename: &str,
    bytes: &[u8],
    pdf: &dyn PdfTextSource,
    docx: &dyn DocxTextSource,
    options: &IngestOptions,
) -> Result<PartialResumeData, IngestError> {
    if bytes.len() > options.max_bytes {
        return Err(IngestError::FileTooLarge {
            size: bytes.len(),
            limit: options.max_bytes,
        });
    }
    if bytes.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    let ext = extension_of(filename);
    let format = FileFormat::from_extension(&ext)?;
    info!("Importing {filename} as {format:?} ({} bytes)", bytes.len());

    let result = match format {
        FileFormat::Pdf => {
            let raw = acquire_pdf(pdf, bytes, options.line_tolerance).await;
            raw.and_then(|raw| parse_resume_text(&raw))
        }
        FileFormat::Docx => acquire_docx(docx, bytes)
            .await
            .and_then(|raw| parse_resume_text(&raw)),
        FileFormat::PlainText => parse_resume_text(&acquire_plain(bytes)),
        FileFormat::Latex => Ok(parse_latex_resume(&acquire_plain(bytes).text)),
        FileFormat::Json => Err(IngestError::JsonPassthrough),
    };

    result.map_err(|err| match err {
        IngestError::ExtractionFailure { reason, .. } => {
            error!("Resume parser error for .{ext}: {reason}");
            IngestError::ExtractionFailure { ext: ext.clone(), reason }
        }
        other => other,
    })
}
