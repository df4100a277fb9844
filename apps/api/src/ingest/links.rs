//! Link classification: raw URLs → labelled, deduplicated `Website` entries.

use std::collections::HashSet;

use url::Url;

use crate::ingest::acquire::RawDocument;
use crate::ingest::patterns::find_urls;
use crate::models::resume::Website;

/// Label for a single URL, or `None` when the URL is dropped (mailto).
fn label_for(url: &str) -> Option<String> {
    let lower = url.to_lowercase();
    if lower.contains("linkedin.com") {
        return Some("LinkedIn".to_string());
    }
    if lower.contains("github.com") {
        return Some("GitHub".to_string());
    }
    if lower.starts_with("mailto:") {
        return None;
    }

    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.strip_prefix("www.").unwrap_or(h).to_string()))
        .filter(|h| !h.is_empty());
    Some(host.unwrap_or_else(|| "Website".to_string()))
}

/// Classifies `urls` in order. Deduplicates on the exact URL string; first occurrence wins.
pub fn classify_links(urls: &[String]) -> Vec<Website> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut websites = Vec::new();
    for url in urls {
        let Some(name) = label_for(url) else {
            continue;
        };
        if seen.insert(url.as_str()) {
            websites.push(Website {
                name,
                url: url.clone(),
            });
        }
    }
    websites
}

/// Websites for a document.
///
/// Links found during acquisition win outright; the text is only scanned for
/// `http(s)://` URLs when acquisition found none. The two sources are never merged.
pub fn websites_for(raw: &RawDocument) -> Vec<Website> {
    if raw.links.is_empty() {
        classify_links(&find_urls(&raw.text))
    } else {
        classify_links(&raw.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_linkedin_and_github_labels() {
        let sites = classify_links(&urls(&[
            "https://www.linkedin.com/in/jane",
            "https://GitHub.com/jane",
        ]));
        assert_eq!(sites[0].name, "LinkedIn");
        assert_eq!(sites[1].name, "GitHub");
    }

    #[test]
    fn test_generic_site_uses_hostname_without_www() {
        let sites = classify_links(&urls(&["https://www.janedoe.dev/about"]));
        assert_eq!(sites[0].name, "janedoe.dev");
        assert_eq!(sites[0].url, "https://www.janedoe.dev/about");
    }

    #[test]
    fn test_unparseable_url_falls_back_to_website() {
        let sites = classify_links(&urls(&["http://"]));
        assert_eq!(sites[0].name, "Website");
    }

    #[test]
    fn test_mailto_is_dropped() {
        let sites = classify_links(&urls(&["mailto:jane@x.com", "https://a.dev"]));
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].url, "https://a.dev");
    }

    #[test]
    fn test_duplicate_url_yields_single_website() {
        let sites = classify_links(&urls(&["https://a.dev", "https://a.dev"]));
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let sites = classify_links(&urls(&["https://b.dev", "https://a.dev", "https://b.dev"]));
        let order: Vec<_> = sites.iter().map(|w| w.url.as_str()).collect();
        assert_eq!(order, vec!["https://b.dev", "https://a.dev"]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let first = classify_links(&urls(&["https://a.dev", "https://github.com/x"]));
        let again: Vec<String> = first.iter().map(|w| w.url.clone()).collect();
        assert_eq!(classify_links(&again), first);
    }

    #[test]
    fn test_acquired_links_suppress_text_scan() {
        let raw = RawDocument {
            text: "Portfolio: https://text-only.dev".to_string(),
            links: urls(&["https://github.com/jane"]),
        };
        let sites = websites_for(&raw);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name, "GitHub");
    }

    #[test]
    fn test_text_scan_when_no_links_acquired() {
        let raw = RawDocument {
            text: "Jane\nhttps://linkedin.com/in/jane\nhttps://jane.io".to_string(),
            links: vec![],
        };
        let sites = websites_for(&raw);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].name, "LinkedIn");
        assert_eq!(sites[1].name, "jane.io");
    }
}
