//! Parser for text copied from a LinkedIn profile page.
//!
//! Much looser than the file pipeline: a keyword anywhere in a line switches mode,
//! and each mode has a single rule for the lines that follow.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{Education, PartialResumeData, Skill, WorkExperience};

pub const IMPORTED_SKILLS_CATEGORY: &str = "Imported Skills";
const PLACEHOLDER_POSITION: &str = "Role";
const MIN_INSTITUTION_CHARS: usize = 6;

static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Summary,
    Experience,
    Education,
    Skills,
}

fn mode_switch(line: &str) -> Option<Mode> {
    let lower = line.to_lowercase();
    if lower.contains("about") || lower.contains("summary") {
        Some(Mode::Summary)
    } else if lower.contains("experience") {
        Some(Mode::Experience)
    } else if lower.contains("education") {
        Some(Mode::Education)
    } else if lower.contains("skills") {
        Some(Mode::Skills)
    } else {
        None
    }
}

pub fn parse_linkedin_text(text: &str) -> PartialResumeData {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut parsed = PartialResumeData::default();
    parsed.basics.name = lines.first().map(|l| l.to_string());

    let mut summary: Vec<&str> = Vec::new();
    let mut mode: Option<Mode> = None;

    for line in lines.iter().copied() {
        if let Some(next) = mode_switch(line) {
            mode = Some(next);
            continue;
        }
        match mode {
            Some(Mode::Summary) => summary.push(line),
            Some(Mode::Experience) => {
                if RE_YEAR.is_match(line) {
                    parsed.work.push(WorkExperience {
                        company: line.to_string(),
                        position: PLACEHOLDER_POSITION.to_string(),
                        bullets: vec![String::new()],
                        ..Default::default()
                    });
                } else if let Some(last) = parsed.work.last_mut() {
                    if last.bullets.first().is_some_and(String::is_empty) {
                        last.bullets[0] = line.to_string();
                    } else {
                        last.bullets.push(line.to_string());
                    }
                }
            }
            Some(Mode::Education) => {
                if line.chars().count() >= MIN_INSTITUTION_CHARS && !line.contains('|') {
                    parsed.education.push(Education::with_institution(line));
                }
            }
            Some(Mode::Skills) => {
                let items: Vec<String> = line
                    .split(|c: char| matches!(c, ',' | '|' | '•'))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                if !items.is_empty() {
                    parsed.skills.push(Skill {
                        category: IMPORTED_SKILLS_CATEGORY.to_string(),
                        items,
                    });
                }
            }
            None => {}
        }
    }

    if !summary.is_empty() {
        parsed.basics.summary = Some(summary.join(" "));
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = "Jane Doe
Staff Engineer at Acme
About
I build distributed systems.
Mostly in Rust.
Experience
Acme Corp 2020 - Present
Led the storage team
Shipped v2
Initech 2017 - 2020
Education
MIT
State University | 2013 - 2017
Stanford University
Skills
Rust, Go • Kubernetes | Terraform";

    #[test]
    fn test_name_and_summary() {
        let parsed = parse_linkedin_text(PROFILE);
        assert_eq!(parsed.basics.name.as_deref(), Some("Jane Doe"));
        assert_eq!(
            parsed.basics.summary.as_deref(),
            Some("I build distributed systems. Mostly in Rust.")
        );
    }

    #[test]
    fn test_year_lines_open_work_entries() {
        let parsed = parse_linkedin_text(PROFILE);
        assert_eq!(parsed.work.len(), 2);
        assert_eq!(parsed.work[0].company, "Acme Corp 2020 - Present");
        assert_eq!(parsed.work[0].position, "Role");
        assert_eq!(parsed.work[0].bullets, vec!["Led the storage team", "Shipped v2"]);
        assert_eq!(parsed.work[1].bullets, vec![String::new()]);
    }

    #[test]
    fn test_education_skips_short_and_piped_lines() {
        let parsed = parse_linkedin_text(PROFILE);
        let names: Vec<&str> = parsed.education.iter().map(|e| e.institution.as_str()).collect();
        assert_eq!(names, vec!["Stanford University"]);
    }

    #[test]
    fn test_skills_split_on_comma_pipe_and_bullet() {
        let parsed = parse_linkedin_text(PROFILE);
        assert_eq!(parsed.skills.len(), 1);
        assert_eq!(parsed.skills[0].category, IMPORTED_SKILLS_CATEGORY);
        assert_eq!(parsed.skills[0].items, vec!["Rust", "Go", "Kubernetes", "Terraform"]);
    }

    #[test]
    fn test_lines_before_any_mode_are_ignored() {
        let parsed = parse_linkedin_text("Jane Doe\nHeadline 2024\nBerlin");
        assert!(parsed.work.is_empty());
        assert!(parsed.basics.summary.is_none());
    }

    #[test]
    fn test_blank_text_yields_nothing() {
        assert_eq!(parse_linkedin_text("  \n "), PartialResumeData::default());
    }
}
