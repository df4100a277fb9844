use std::sync::Arc;

use crate::config::Config;
use crate::ingest::acquire::{DocxTextSource, PdfTextSource};
use crate::ingest::docx_source::ZipDocxSource;
use crate::ingest::pdf_source::OxidePdfSource;
use crate::ingest::IngestOptions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Positioned-text extraction for PDFs. Default: pdf_oxide.
    pub pdf: Arc<dyn PdfTextSource>,
    /// Raw-text extraction for DOCX packages. Default: zip + quick-xml.
    pub docx: Arc<dyn DocxTextSource>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            pdf: Arc::new(OxidePdfSource),
            docx: Arc::new(ZipDocxSource),
        }
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            max_bytes: self.config.max_upload_bytes,
            line_tolerance: self.config.pdf_line_tolerance,
        }
    }
}
