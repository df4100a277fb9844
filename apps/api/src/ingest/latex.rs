//! Structural extraction from LaTeX résumé sources.
//!
//! LaTeX keeps its structure in macros, so this path works on the source text
//! directly instead of going through acquisition and line segmentation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ingest::patterns::{find_date_range, find_email, split_items};
use crate::models::resume::{Education, PartialBasics, PartialResumeData, Skill, WorkExperience};

// Ordered fallback chains: the first pattern that matches wins.
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\\name\{([^}]+)\}",
        r"(?i)\\textbf\{\\Huge\s+([^}]+)\}",
        r"(?i)\\begin\{center\}[^}]*\\textbf\{\\huge\s+([^}]+)\}",
        r"(?i)\\centerline\{\\namesize\\bfseries\s+([^}]+)\}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_MAILTO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\href\{mailto:([^}]+)\}").unwrap());

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:phone|tel|mobile)[:\s]*([+\d\s().-]{7,})",
        r"(\(?\d{3}\)?[\s.-]\d{3}[\s.-]\d{4})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_EXPERIENCE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\\(?:section|subsection)\*?\{(?:Experience|Work|Employment|Professional)[^}]*\}")
        .unwrap()
});

static RE_EDUCATION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\\(?:section|subsection)\*?\{Education[^}]*\}").unwrap());

static RE_SKILLS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\\(?:section|subsection)\*?\{(?:Skills|Technical)[^}]*\}").unwrap()
});

static RE_SECTION_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:section|subsection)\*?\{|\\end\{document\}").unwrap());

/// Entry openers. The match consumes the opening brace of the first group; only
/// openers outside any brace group count (see `entries`).
static RE_ENTRY_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:resumeSubheading|entry|textbf)\s*\{").unwrap());

static RE_SKILL_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(?:item|resumeItem|textbf)\{?").unwrap());

static RE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\resumeItem\s*\{|\\item\s+").unwrap());

static RE_COMMAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[a-zA-Z]+\*?").unwrap());

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Entries shorter than this (trimmed) are template residue.
const MIN_ENTRY_CHARS: usize = 10;
const MIN_SKILL_CHARS: usize = 3;

pub fn parse_latex_resume(tex: &str) -> PartialResumeData {
    let basics = PartialBasics {
        name: first_capture(&NAME_PATTERNS, tex),
        email: RE_MAILTO
            .captures(tex)
            .map(|c| c[1].trim().to_string())
            .or_else(|| find_email(tex).map(String::from)),
        phone: first_capture(&PHONE_PATTERNS, tex),
        ..Default::default()
    };

    PartialResumeData {
        basics,
        work: section_body(tex, &RE_EXPERIENCE_HEADER)
            .map(parse_work_entries)
            .unwrap_or_default(),
        education: section_body(tex, &RE_EDUCATION_HEADER)
            .map(parse_education_entries)
            .unwrap_or_default(),
        skills: section_body(tex, &RE_SKILLS_HEADER)
            .map(parse_skills)
            .unwrap_or_default(),
    }
}

fn first_capture(patterns: &[Regex], tex: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(tex))
        .map(|c| c[1].trim().to_string())
}

/// Text between the first header match and the next sectioning command, `\end{document}`,
/// or the end of the source.
pub fn section_body<'a>(tex: &'a str, header: &Regex) -> Option<&'a str> {
    let start = header.find(tex)?.end();
    let rest = &tex[start..];
    let end = RE_SECTION_END.find(rest).map_or(rest.len(), |m| m.start());
    Some(&rest[..end])
}

/// Reads one brace group. `s` starts just after the opening `{`; returns the
/// group content and the text after its matching `}`.
fn read_group(s: &str) -> Option<(&str, &str)> {
    let mut depth = 1usize;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[..i], &s[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// The run of `{..}{..}` groups an entry opens with. `entry` starts inside the first group.
pub fn leading_groups(entry: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut rest = entry;
    while let Some((content, after)) = read_group(rest) {
        groups.push(clean_tex(content));
        match after.trim_start().strip_prefix('{') {
            Some(next) => rest = next,
            None => break,
        }
    }
    groups
}

/// Strips macros, braces and stray backslashes; `--`/`---` become an en dash.
pub fn clean_tex(s: &str) -> String {
    let s = s.replace("---", "–").replace("--", "–");
    let s = RE_COMMAND.replace_all(&s, " ");
    let s: String = s.chars().filter(|c| !matches!(c, '{' | '}' | '\\')).collect();
    RE_SPACES.replace_all(&s, " ").trim().to_string()
}

/// `\item text` (rest of the line) and `\resumeItem{text}`, in source order.
/// An entry without any gets one empty placeholder.
pub fn extract_bullets(entry: &str) -> Vec<String> {
    let mut bullets: Vec<String> = RE_BULLET
        .find_iter(entry)
        .filter_map(|m| {
            let after = &entry[m.end()..];
            let raw = if m.as_str().ends_with('{') {
                read_group(after).map(|(content, _)| content)?
            } else {
                after.lines().next().unwrap_or_default()
            };
            Some(clean_tex(raw))
        })
        .filter(|b| !b.is_empty())
        .collect();
    if bullets.is_empty() {
        bullets.push(String::new());
    }
    bullets
}

/// Brace depth after scanning `s`, starting from `depth`. Escaped braces do not count.
fn advance_depth(mut depth: usize, s: &str) -> usize {
    let mut escaped = false;
    for c in s.chars() {
        match (escaped, c) {
            (true, _) => escaped = false,
            (false, '\\') => escaped = true,
            (false, '{') => depth += 1,
            (false, '}') => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}

/// Splits a section body into entries at every opener that sits at brace depth 0, so
/// `\textbf{}` inside a `\resumeItem{...}` bullet never starts an entry. Text before
/// the first opener is dropped.
fn entries(body: &str) -> Vec<&str> {
    let mut bounds: Vec<(usize, usize)> = Vec::new();
    let mut depth = 0;
    let mut scanned = 0;
    for m in RE_ENTRY_OPENER.find_iter(body) {
        depth = advance_depth(depth, &body[scanned..m.start()]);
        scanned = m.start();
        if depth == 0 {
            bounds.push((m.start(), m.end()));
        }
    }

    bounds
        .iter()
        .enumerate()
        .map(|(i, &(_, content_start))| {
            let end = bounds.get(i + 1).map_or(body.len(), |&(next, _)| next);
            &body[content_start..end]
        })
        .filter(|e| e.trim().chars().count() >= MIN_ENTRY_CHARS)
        .collect()
}

/// Pulls the first date-range group out of `groups`, leaving the rest in order.
fn take_dates(groups: &mut Vec<String>) -> Option<(String, String)> {
    let index = groups.iter().position(|g| find_date_range(g).is_some())?;
    find_date_range(&groups.remove(index))
}

fn parse_work_entries(body: &str) -> Vec<WorkExperience> {
    entries(body)
        .into_iter()
        .filter_map(|entry| {
            let mut groups = leading_groups(entry);
            if groups.len() < 2 {
                return None;
            }
            let (start_date, end_date) = take_dates(&mut groups).unwrap_or_default();
            let mut fields = groups.into_iter();
            Some(WorkExperience {
                company: fields.next().unwrap_or_default(),
                position: fields.next().unwrap_or_default(),
                location: fields.next().unwrap_or_default(),
                start_date,
                end_date,
                bullets: extract_bullets(entry),
            })
        })
        .collect()
}

fn parse_education_entries(body: &str) -> Vec<Education> {
    entries(body)
        .into_iter()
        .filter_map(|entry| {
            let mut groups = leading_groups(entry);
            if groups.len() < 2 {
                return None;
            }
            let graduation_date = take_dates(&mut groups)
                .map(|(_, end)| end)
                .unwrap_or_default();
            let mut fields = groups.into_iter();
            Some(Education {
                institution: fields.next().unwrap_or_default(),
                degree: fields.next().unwrap_or_default(),
                location: fields.next().unwrap_or_default(),
                graduation_date,
                ..Default::default()
            })
        })
        .collect()
}

fn parse_skills(body: &str) -> Vec<Skill> {
    RE_SKILL_SPLIT
        .split(body)
        .map(clean_tex)
        .filter(|chunk| chunk.chars().count() >= MIN_SKILL_CHARS)
        .filter_map(|chunk| {
            let (category, items) = chunk.split_once(':')?;
            Some(Skill {
                category: category.trim().to_string(),
                items: split_items(items),
            })
        })
        .collect()
}
