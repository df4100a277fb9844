//! Section segmentation over the trimmed, non-empty lines of a document.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_SECTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(experience|work\s*experience|employment|professional\s*experience|education|skills|technical\s*skills|projects|awards|certifications|summary|objective|profile)",
    )
    .unwrap()
});

/// A header line (lower-cased) and the body lines attributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub lines: Vec<String>,
}

/// Which entity extractor applies to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Summary,
    Other,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        let name = self.name.as_str();
        if ["experience", "employment", "work"].iter().any(|k| name.contains(k)) {
            SectionKind::Experience
        } else if name.contains("education") {
            SectionKind::Education
        } else if name.contains("skills") || name.contains("technical") {
            SectionKind::Skills
        } else if ["summary", "objective", "profile"].iter().any(|k| name.starts_with(k)) {
            SectionKind::Summary
        } else {
            SectionKind::Other
        }
    }
}

pub fn is_section_header(line: &str) -> bool {
    RE_SECTION_HEADER.is_match(line)
}

/// Splits `lines` into sections. Line 0 is the candidate name and never belongs to a body.
///
/// Header lines open a section and are not part of any body. Lines before the
/// first recognised header are dropped.
pub fn segment(lines: &[&str]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for line in lines.iter().skip(1) {
        if is_section_header(line) {
            sections.push(Section {
                name: line.trim().to_lowercase(),
                lines: vec![],
            });
        } else if let Some(current) = sections.last_mut() {
            current.lines.push(line.to_string());
        }
    }
    sections
}
