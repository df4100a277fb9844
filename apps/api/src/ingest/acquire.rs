//! Raw text acquisition: file bytes → `RawDocument { text, links }`.
//!
//! PDF pages arrive as unordered positioned fragments; reading order is rebuilt by
//! sorting top-to-bottom (descending y) and grouping fragments whose y stays within
//! a tolerance band into one line, ordered left-to-right inside the band.
//! DOCX text comes from a `DocxTextSource`; plain text and LaTeX pass through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ingest::patterns::find_urls;
use crate::ingest::IngestError;

/// Default vertical tolerance, in PDF layout units, for grouping fragments into a line.
pub const DEFAULT_LINE_TOLERANCE: f32 = 3.0;

/// Plain text plus hyperlink URLs recovered from one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub text: String,
    pub links: Vec<String>,
}

/// A positioned run of text on a PDF page. `y` grows upwards (PDF user space).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkAnnotation {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfPage {
    pub fragments: Vec<TextFragment>,
    pub links: Vec<LinkAnnotation>,
}

/// Positioned-text capability for PDF documents.
///
/// Implementations must return pages in document order.
/// Carried in `AppState` as `Arc<dyn PdfTextSource>`.
#[async_trait]
pub trait PdfTextSource: Send + Sync {
    async fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PdfPage>, IngestError>;
}

/// Raw-text capability for DOCX documents.
#[async_trait]
pub trait DocxTextSource: Send + Sync {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestError>;
}

/// Rebuilds reading-order lines for one page.
///
/// Whitespace-only fragments are dropped. A new line starts whenever y moves by more
/// than `tolerance` from the previous fragment; each line is its fragments joined by
/// single spaces, sorted by x, and trimmed.
pub fn reconstruct_lines(fragments: &[TextFragment], tolerance: f32) -> Vec<String> {
    let mut items: Vec<&TextFragment> = fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .collect();
    items.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut bands: Vec<Vec<&TextFragment>> = Vec::new();
    let mut last_y: Option<f32> = None;
    for item in items {
        let continues_line = last_y.is_some_and(|y| (y - item.y).abs() <= tolerance);
        if continues_line {
            if let Some(band) = bands.last_mut() {
                band.push(item);
            }
        } else {
            bands.push(vec![item]);
        }
        last_y = Some(item.y);
    }

    bands
        .into_iter()
        .map(|mut band| {
            band.sort_by(|a, b| a.x.total_cmp(&b.x));
            band.iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Joins pages with a blank line and collects links from annotations and the text itself.
///
/// Annotation URLs come first in page order; regex hits on the rebuilt text are appended
/// when not already present.
pub fn assemble_pdf(pages: &[PdfPage], tolerance: f32) -> Result<RawDocument, IngestError> {
    let page_texts: Vec<String> = pages
        .iter()
        .map(|page| reconstruct_lines(&page.fragments, tolerance).join("\n"))
        .filter(|text| !text.is_empty())
        .collect();
    let text = page_texts.join("\n\n");

    if text.trim().is_empty() {
        return Err(IngestError::EmptyExtraction(
            "No text could be extracted from this PDF. It may be image-based (scanned). \
             Try converting to a text-based PDF or use a plain text file."
                .to_string(),
        ));
    }

    let mut links: Vec<String> = Vec::new();
    let annotated = pages.iter().flat_map(|p| p.links.iter().map(|l| l.url.clone()));
    for url in annotated.chain(find_urls(&text)) {
        if !links.contains(&url) {
            links.push(url);
        }
    }

    Ok(RawDocument { text, links })
}

pub async fn acquire_pdf(
    source: &dyn PdfTextSource,
    bytes: &[u8],
    tolerance: f32,
) -> Result<RawDocument, IngestError> {
    let pages = source.extract_pages(bytes).await?;
    tracing::debug!("PDF yielded {} page(s)", pages.len());
    assemble_pdf(&pages, tolerance)
}

pub async fn acquire_docx(
    source: &dyn DocxTextSource,
    bytes: &[u8],
) -> Result<RawDocument, IngestError> {
    let text = source.extract_text(bytes).await?;
    if text.trim().is_empty() {
        return Err(IngestError::EmptyExtraction(
            "No text could be extracted from this document. Try a PDF or plain text export."
                .to_string(),
        ));
    }
    Ok(RawDocument {
        text,
        links: vec![],
    })
}

/// Identity acquisition for `.txt` and `.tex`. Invalid UTF-8 is replaced, a BOM is dropped.
pub fn acquire_plain(bytes: &[u8]) -> RawDocument {
    let text = String::from_utf8_lossy(bytes);
    RawDocument {
        text: text.trim_start_matches('\u{feff}').to_string(),
        links: vec![],
    }
}
