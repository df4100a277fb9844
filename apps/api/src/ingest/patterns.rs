//! Shared line-level patterns: bullets, date ranges, contact details and URLs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading glyphs that mark a bullet point.
pub const BULLET_GLYPHS: &[char] = &['•', '-', '*', '–'];

static RE_MONTH_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\w*\.?\s+\d{4})\s*[-–—]\s*((?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\w*\.?\s+\d{4}|Present|Current)",
    )
    .unwrap()
});

static RE_YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{4})\s*[-–—]\s*(\d{4}|Present|Current)").unwrap());

pub static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})").unwrap());

static RE_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4})").unwrap());

static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)https?://[^\s,;)>\]"']+"#).unwrap());

pub fn is_bullet(line: &str) -> bool {
    line.starts_with(BULLET_GLYPHS)
}

/// Removes one leading bullet glyph and the whitespace after it.
pub fn strip_bullet(line: &str) -> &str {
    match line.strip_prefix(BULLET_GLYPHS) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Finds a `Mon YYYY – Mon YYYY|Present` or `YYYY – YYYY|Present` range.
/// The month form is tried first.
pub fn find_date_range(line: &str) -> Option<(String, String)> {
    [&*RE_MONTH_RANGE, &*RE_YEAR_RANGE]
        .iter()
        .find_map(|re| re.captures(line))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
}

pub fn find_email(line: &str) -> Option<&str> {
    RE_EMAIL.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

pub fn find_phone(line: &str) -> Option<&str> {
    RE_PHONE.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// All `http(s)://` URLs in `text`, in order of appearance.
pub fn find_urls(text: &str) -> Vec<String> {
    RE_URL.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Splits a skills list on commas and semicolons, dropping empty items.
pub fn split_items(list: &str) -> Vec<String> {
    list.split(|c: char| c == ',' || c == ';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
