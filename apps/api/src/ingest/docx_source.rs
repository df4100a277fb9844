//! `DocxTextSource` over the OOXML package: unzip, stream `word/document.xml`, keep the text runs.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::ingest::acquire::DocxTextSource;
use crate::ingest::IngestError;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipDocxSource;

#[async_trait]
impl DocxTextSource for ZipDocxSource {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestError> {
        let owned = bytes.to_vec();
        tokio::task::spawn_blocking(move || read_document_text(&owned))
            .await
            .map_err(|e| IngestError::extraction("docx", format!("extraction task failed: {e}")))?
    }
}

fn read_document_text(bytes: &[u8]) -> Result<String, IngestError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        IngestError::extraction(
            "docx",
            format!(
                "not a valid .docx package ({e}). Older .doc files are not supported, \
                 please re-save as .docx"
            ),
        )
    })?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| IngestError::extraction("docx", format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| IngestError::extraction("docx", format!("unreadable {DOCUMENT_PART}: {e}")))?;

    document_xml_to_text(&xml)
}

/// Flattens WordprocessingML to plain text: one line per paragraph, tabs and breaks kept.
pub fn document_xml_to_text(xml: &str) -> Result<String, IngestError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let run = e.unescape().map_err(|err| {
                        IngestError::extraction("docx", format!("bad text run: {err}"))
                    })?;
                    text.push_str(&run);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IngestError::extraction(
                    "docx",
                    format!("XML parse error: {e}"),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Acme </w:t></w:r><w:r><w:t>&amp; Sons</w:t></w:r></w:p>
    <w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>Rust</w:t><w:br/><w:t>Go</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_paragraphs_become_lines() {
        let text = document_xml_to_text(DOCUMENT_XML).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Jane Doe", "Acme & Sons", "Skills\tRust", "Go"]);
    }

    #[test]
    fn test_markup_outside_text_runs_is_ignored() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Only this</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(document_xml_to_text(xml).unwrap(), "Only this\n");
    }

    #[test]
    fn test_undefined_entity_in_text_run_is_extraction_failure() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>Acme &bogus; Corp</w:t></w:r></w:p></w:body></w:document>"#;
        match document_xml_to_text(xml).unwrap_err() {
            IngestError::ExtractionFailure { ext, reason } => {
                assert_eq!(ext, "docx");
                assert!(reason.contains("bad text run"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_legacy_doc_bytes_fail_with_resave_hint() {
        let err = ZipDocxSource
            .extract_text(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("re-save as .docx"));
    }
}
