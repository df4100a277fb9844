//! `PdfTextSource` backed by pdf_oxide.
//!
//! pdf_oxide opens documents from a path, so the upload is spooled to a temp file first.
//! The whole read runs on the blocking pool and visits pages strictly in order.

use std::io::Write;

use async_trait::async_trait;
use pdf_oxide::{Annotation, LinkAction, PdfDocument};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::ingest::acquire::{LinkAnnotation, PdfPage, PdfTextSource, TextFragment};
use crate::ingest::IngestError;

#[derive(Debug, Clone, Copy, Default)]
pub struct OxidePdfSource;

#[async_trait]
impl PdfTextSource for OxidePdfSource {
    async fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PdfPage>, IngestError> {
        let owned = bytes.to_vec();
        tokio::task::spawn_blocking(move || read_pages(&owned))
            .await
            .map_err(|e| IngestError::extraction("pdf", format!("extraction task failed: {e}")))?
    }
}

fn read_pages(bytes: &[u8]) -> Result<Vec<PdfPage>, IngestError> {
    let fail = |e: &dyn std::fmt::Display| IngestError::extraction("pdf", e);

    let mut spool = NamedTempFile::new().map_err(|e| fail(&e))?;
    spool
        .write_all(bytes)
        .and_then(|_| spool.flush())
        .map_err(|e| fail(&e))?;

    let doc = PdfDocument::open(spool.path()).map_err(|e| fail(&e))?;
    let page_count = doc.page_count().map_err(|e| fail(&e))?;

    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let fragments = doc
            .extract_spans(index)
            .map_err(|e| fail(&e))?
            .into_iter()
            .map(|span| TextFragment {
                text: span.text,
                x: span.bbox.x,
                y: span.bbox.y,
            })
            .collect();

        // Some producers write annotation arrays pdf_oxide cannot walk; text still counts.
        let links = match doc.get_annotations(index) {
            Ok(annotations) => annotations.into_iter().filter_map(link_target).collect(),
            Err(e) => {
                warn!("Skipping link annotations on page {}: {e}", index + 1);
                vec![]
            }
        };

        pages.push(PdfPage { fragments, links });
    }

    Ok(pages)
}

fn link_target(annotation: Annotation) -> Option<LinkAnnotation> {
    match annotation.action {
        Some(LinkAction::Uri(url)) if !url.trim().is_empty() => Some(LinkAnnotation {
            url: url.trim().to_string(),
        }),
        _ => None,
    }
}
