//! Heuristic entity extraction for line-based documents (PDF, DOCX, plain text).
//!
//! Work and education entries are built by folding over a section's lines with an
//! `Entries` accumulator: finished entries plus the one still being filled. Each
//! step consumes the accumulator and returns the next one, so every transition can
//! be tested on its own.

use tracing::debug;

use crate::ingest::acquire::RawDocument;
use crate::ingest::links::websites_for;
use crate::ingest::patterns::{
    find_date_range, find_email, find_phone, is_bullet, split_items, strip_bullet,
};
use crate::ingest::sections::{segment, SectionKind};
use crate::ingest::IngestError;
use crate::models::resume::{Education, PartialBasics, PartialResumeData, Skill, WorkExperience};

/// Category used for skill lines without a `category:` prefix.
pub const GENERAL_SKILL_CATEGORY: &str = "General";

/// Education lines this short are treated as noise.
const MIN_EDUCATION_LINE_CHARS: usize = 4;

/// Fold accumulator: finished entries plus the entry currently being filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Entries<T> {
    pub done: Vec<T>,
    pub current: Option<T>,
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self {
            done: Vec::new(),
            current: None,
        }
    }
}

impl<T> Entries<T> {
    /// Closes the current entry (if any) and starts `entry`.
    pub fn open(mut self, entry: T) -> Self {
        self.done.extend(self.current.take());
        self.current = Some(entry);
        self
    }

    /// Applies `f` to the current entry; a no-op when nothing is open.
    pub fn update(mut self, f: impl FnOnce(&mut T)) -> Self {
        if let Some(entry) = self.current.as_mut() {
            f(entry);
        }
        self
    }

    pub fn finish(mut self) -> Vec<T> {
        self.done.extend(self.current.take());
        self.done
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Basics
// ────────────────────────────────────────────────────────────────────────────

/// Name is line 0 verbatim; email and phone are the first matches anywhere.
pub fn extract_basics(lines: &[&str]) -> PartialBasics {
    PartialBasics {
        name: lines.first().map(|l| l.to_string()),
        email: lines.iter().find_map(|l| find_email(l)).map(String::from),
        phone: lines.iter().find_map(|l| find_phone(l)).map(String::from),
        ..Default::default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Work experience
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum WorkLine<'a> {
    Dates { start: String, end: String },
    Bullet(&'a str),
    Text(&'a str),
}

fn classify_work_line(line: &str) -> WorkLine<'_> {
    if let Some((start, end)) = find_date_range(line) {
        WorkLine::Dates { start, end }
    } else if is_bullet(line) {
        WorkLine::Bullet(strip_bullet(line))
    } else {
        WorkLine::Text(line)
    }
}

/// One transition of the work-experience fold.
///
/// - date range → dates of the open entry (dropped when none is open)
/// - bullet → appended to the open entry (dropped when none is open)
/// - other text → `position` of an open entry that lacks one, otherwise a new entry's `company`
pub fn work_step(acc: Entries<WorkExperience>, line: &str) -> Entries<WorkExperience> {
    match classify_work_line(line) {
        WorkLine::Dates { start, end } => acc.update(|w| {
            w.start_date = start;
            w.end_date = end;
        }),
        WorkLine::Bullet(text) => acc.update(|w| w.bullets.push(text.to_string())),
        WorkLine::Text(text) => {
            let needs_position = acc.current.as_ref().is_some_and(|w| w.position.is_empty());
            if needs_position {
                acc.update(|w| w.position = text.to_string())
            } else {
                acc.open(WorkExperience::with_company(text))
            }
        }
    }
}

pub fn extract_work(lines: &[String]) -> Vec<WorkExperience> {
    let mut entries = lines
        .iter()
        .fold(Entries::default(), |acc, line| work_step(acc, line))
        .finish();
    for entry in &mut entries {
        entry.ensure_bullet_row();
    }
    entries
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// One transition of the education fold: institution, then degree, then a new entry.
pub fn education_step(acc: Entries<Education>, line: &str) -> Entries<Education> {
    if is_bullet(line) || line.chars().count() < MIN_EDUCATION_LINE_CHARS {
        return acc;
    }
    let needs_degree = acc.current.as_ref().is_some_and(|e| e.degree.is_empty());
    if needs_degree {
        acc.update(|e| e.degree = line.to_string())
    } else {
        acc.open(Education::with_institution(line))
    }
}

pub fn extract_education(lines: &[String]) -> Vec<Education> {
    lines
        .iter()
        .fold(Entries::default(), |acc, line| education_step(acc, line))
        .finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// `Category: a, b; c` → one skill group. Lines without a colon go under "General".
pub fn parse_skill_line(line: &str) -> Option<Skill> {
    match line.split_once(':') {
        Some((category, items)) => Some(Skill {
            category: strip_bullet(category.trim()).trim().to_string(),
            items: split_items(items),
        }),
        None => {
            let items = split_items(strip_bullet(line));
            (!items.is_empty()).then(|| Skill {
                category: GENERAL_SKILL_CATEGORY.to_string(),
                items,
            })
        }
    }
}

pub fn extract_skills(lines: &[String]) -> Vec<Skill> {
    lines.iter().filter_map(|l| parse_skill_line(l)).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Whole document
// ────────────────────────────────────────────────────────────────────────────

/// Runs segmentation and every extractor over an acquired document.
pub fn parse_resume_text(raw: &RawDocument) -> Result<PartialResumeData, IngestError> {
    let lines: Vec<&str> = raw
        .text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(IngestError::EmptyExtraction(
            "No text content could be extracted from the file. The file may be image-based or empty."
                .to_string(),
        ));
    }

    let mut result = PartialResumeData {
        basics: extract_basics(&lines),
        ..Default::default()
    };
    result.basics.websites = websites_for(raw);

    let sections = segment(&lines);
    let mut summary: Vec<&str> = Vec::new();
    for section in &sections {
        match section.kind() {
            SectionKind::Experience => result.work.extend(extract_work(&section.lines)),
            SectionKind::Education => result.education.extend(extract_education(&section.lines)),
            SectionKind::Skills => result.skills.extend(extract_skills(&section.lines)),
            SectionKind::Summary => summary.extend(section.lines.iter().map(String::as_str)),
            SectionKind::Other => {}
        }
    }
    if !summary.is_empty() {
        result.basics.summary = Some(summary.join(" "));
    }

    debug!(
        "Parsed {} section(s): {} work, {} education, {} skill group(s), {} website(s)",
        sections.len(),
        result.work.len(),
        result.education.len(),
        result.skills.len(),
        result.basics.websites.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JANE_RESUME: &str =
        "Jane Doe\njane@x.com\n(555) 123-4567\nEXPERIENCE\nAcme Corp\nEngineer\nJan 2020 - Present\n• Built things";

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn parse(text: &str) -> PartialResumeData {
        parse_resume_text(&RawDocument {
            text: text.to_string(),
            links: vec![],
        })
        .unwrap()
    }

    #[test]
    fn test_plain_text_scenario() {
        let parsed = parse(JANE_RESUME);
        assert_eq!(parsed.basics.name.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.basics.email.as_deref(), Some("jane@x.com"));
        assert_eq!(parsed.basics.phone.as_deref(), Some("(555) 123-4567"));
        assert_eq!(parsed.work.len(), 1);
        let work = &parsed.work[0];
        assert_eq!(work.company, "Acme Corp");
        assert_eq!(work.position, "Engineer");
        assert!(work.start_date.contains("Jan 2020"));
        assert!(work.end_date.contains("Present"));
        assert_eq!(work.bullets, vec!["Built things"]);
    }

    #[test]
    fn test_empty_text_is_empty_extraction() {
        let err = parse_resume_text(&RawDocument {
            text: " \n\t\n".to_string(),
            links: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, IngestError::EmptyExtraction(_)));
    }

    #[test]
    fn test_first_match_wins_for_contacts() {
        let lines = vec!["Jane", "a@first.com", "b@second.com", "555-111-2222", "555-333-4444"];
        let basics = extract_basics(&lines);
        assert_eq!(basics.email.as_deref(), Some("a@first.com"));
        assert_eq!(basics.phone.as_deref(), Some("555-111-2222"));
    }

    #[test]
    fn test_work_step_date_without_entry_is_dropped() {
        let acc = work_step(Entries::default(), "2019 - 2021");
        assert_eq!(acc, Entries::default());
    }

    #[test]
    fn test_work_step_bullet_without_entry_is_dropped() {
        let acc = work_step(Entries::default(), "• orphan bullet");
        assert!(acc.current.is_none());
    }

    #[test]
    fn test_work_step_text_fills_position_then_opens_new_entry() {
        let acc = work_step(Entries::default(), "Acme Corp");
        let acc = work_step(acc, "Engineer");
        assert_eq!(acc.current.as_ref().unwrap().position, "Engineer");
        let acc = work_step(acc, "Globex");
        assert_eq!(acc.done.len(), 1);
        assert_eq!(acc.current.as_ref().unwrap().company, "Globex");
        assert!(acc.current.as_ref().unwrap().position.is_empty());
    }

    #[test]
    fn test_work_entries_without_bullets_get_placeholder() {
        let work = extract_work(&owned(&[
            "Acme Corp",
            "Engineer",
            "Globex",
            "Manager",
            "- Led team",
        ]));
        assert_eq!(work.len(), 2);
        assert_eq!(work[0].bullets, vec![String::new()]);
        assert_eq!(work[1].bullets, vec!["Led team"]);
    }

    #[test]
    fn test_year_range_updates_dates() {
        let work = extract_work(&owned(&["Acme Corp", "Engineer", "2016 – 2019"]));
        assert_eq!(work[0].start_date, "2016");
        assert_eq!(work[0].end_date, "2019");
    }

    #[test]
    fn test_education_institution_then_degree_then_new_entry() {
        let education = extract_education(&owned(&[
            "State University",
            "B.S. Computer Science",
            "• Dean's list",
            "City College",
        ]));
        assert_eq!(education.len(), 2);
        assert_eq!(education[0].institution, "State University");
        assert_eq!(education[0].degree, "B.S. Computer Science");
        assert_eq!(education[1].institution, "City College");
        assert!(education[1].degree.is_empty());
    }

    #[test]
    fn test_education_ignores_short_noise_lines() {
        let education = extract_education(&owned(&["MIT", "Massachusetts Institute"]));
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].institution, "Massachusetts Institute");
    }

    #[test]
    fn test_skill_line_with_category() {
        let skill = parse_skill_line("Languages: Go, Rust, Python").unwrap();
        assert_eq!(skill.category, "Languages");
        assert_eq!(skill.items, vec!["Go", "Rust", "Python"]);
    }

    #[test]
    fn test_skill_line_without_colon_goes_to_general() {
        let skill = parse_skill_line("• Docker; Kubernetes").unwrap();
        assert_eq!(skill.category, GENERAL_SKILL_CATEGORY);
        assert_eq!(skill.items, vec!["Docker", "Kubernetes"]);
    }

    #[test]
    fn test_bulleted_category_is_stripped() {
        let skill = parse_skill_line("- Tools: Git").unwrap();
        assert_eq!(skill.category, "Tools");
    }

    #[test]
    fn test_summary_section_fills_basics_summary() {
        let parsed = parse("Jane Doe\nSummary\nBackend engineer.\nLoves Rust.\nSkills\nRust");
        assert_eq!(
            parsed.basics.summary.as_deref(),
            Some("Backend engineer. Loves Rust.")
        );
        assert_eq!(parsed.skills.len(), 1);
    }

    #[test]
    fn test_text_urls_become_websites() {
        let parsed = parse("Jane Doe\nhttps://github.com/jane\nExperience\nAcme Corp");
        assert_eq!(parsed.basics.websites.len(), 1);
        assert_eq!(parsed.basics.websites[0].name, "GitHub");
    }

    #[test]
    fn test_every_work_entry_has_a_bullet_row() {
        let parsed = parse(
            "Jane\nWork Experience\nAcme\nDev\nInitech\nQA\n* Tested\nProfessional Experience\nSolo Shop",
        );
        assert_eq!(parsed.work.len(), 3);
        assert!(parsed.work.iter().all(|w| !w.bullets.is_empty()));
    }
}
