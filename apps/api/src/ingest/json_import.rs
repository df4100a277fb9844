//! JSON snapshot export and import with schema migration.
//!
//! Import parses into a `serde_json::Value`, upgrades legacy shapes in place, then
//! deserialises into `ResumeData`. Migrating an already-current snapshot is a no-op.

use serde_json::{json, Map, Value};

use crate::ingest::IngestError;
use crate::models::resume::ResumeData;

/// Built-in section ids, in default display order.
pub const KNOWN_SECTIONS: [&str; 6] = ["profile", "education", "work", "skills", "projects", "awards"];

/// Legacy single-link basics fields and the website label each becomes.
const LEGACY_LINK_FIELDS: [(&str, &str); 3] = [
    ("linkedin", "LinkedIn"),
    ("github", "GitHub"),
    ("portfolio", "Portfolio"),
];

pub fn export_to_json(data: &ResumeData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

pub fn import_from_json(text: &str) -> Result<ResumeData, IngestError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| IngestError::InvalidFormat(e.to_string()))?;
    serde_json::from_value(migrate(value)).map_err(|e| IngestError::InvalidFormat(e.to_string()))
}

/// Upgrades a raw snapshot to the current shape. Non-object input is returned as-is.
pub fn migrate(mut value: Value) -> Value {
    if let Some(root) = value.as_object_mut() {
        if let Some(basics) = root.get_mut("basics").and_then(Value::as_object_mut) {
            migrate_legacy_links(basics);
        }
        let custom_ids = root
            .get_mut("customSections")
            .and_then(Value::as_array_mut)
            .map(|sections| migrate_custom_sections(sections))
            .unwrap_or_default();
        if let Some(sections) = root.get_mut("sections").and_then(Value::as_array_mut) {
            normalize_section_ids(sections, &custom_ids);
        }
    }
    value
}

/// Moves `linkedin`/`github`/`portfolio` strings to the front of `websites`.
fn migrate_legacy_links(basics: &mut Map<String, Value>) {
    let mut websites: Vec<Value> = Vec::new();
    for (field, label) in LEGACY_LINK_FIELDS {
        if let Some(Value::String(url)) = basics.remove(field) {
            if !url.trim().is_empty() {
                websites.push(json!({ "name": label, "url": url.trim() }));
            }
        }
    }
    if websites.is_empty() {
        return;
    }
    if let Some(Value::Array(existing)) = basics.remove("websites") {
        websites.extend(existing);
    }
    basics.insert("websites".to_string(), Value::Array(websites));
}

/// Fills missing ids and types, upgrades string items. Returns the section ids.
fn migrate_custom_sections(sections: &mut [Value]) -> Vec<String> {
    let mut ids = Vec::with_capacity(sections.len());
    for (index, section) in sections.iter_mut().enumerate() {
        let Some(section) = section.as_object_mut() else {
            continue;
        };

        let id = match section.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("custom-{index}"),
        };
        section.insert("id".to_string(), Value::String(id.clone()));
        ids.push(id);

        if section.get("type").map_or(true, Value::is_null) {
            section.insert("type".to_string(), json!("bullets"));
        }

        if let Some(items) = section.get_mut("items").and_then(Value::as_array_mut) {
            for item in items.iter_mut() {
                if let Some(title) = item.as_str().map(str::to_string) {
                    *item = json!({ "title": title });
                }
            }
        }
    }
    ids
}

/// First occurrence wins; ids that are neither built-in nor custom are dropped.
fn normalize_section_ids(sections: &mut Vec<Value>, custom_ids: &[String]) {
    let mut kept: Vec<Value> = Vec::with_capacity(sections.len());
    for section in sections.drain(..) {
        let Some(id) = section.as_str() else {
            continue;
        };
        let known = KNOWN_SECTIONS.contains(&id) || custom_ids.iter().any(|c| c == id);
        if known && !kept.iter().any(|k| k.as_str() == Some(id)) {
            kept.push(section);
        }
    }
    *sections = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{CustomSection, CustomSectionType, Website};

    const LEGACY_SNAPSHOT: &str = r#"{
        "basics": {
            "name": "Jane Doe",
            "linkedin": "https://linkedin.com/in/jane",
            "github": "",
            "websites": [{"name": "Blog", "url": "https://jane.dev"}]
        },
        "customSections": [
            {"title": "Talks", "items": ["RustConf 2023", {"title": "FOSDEM"}]},
            {"id": "custom-volunteer", "title": "Volunteering", "type": "text", "items": []}
        ],
        "sections": ["profile", "work", "work", "legacy", "custom-0", "custom-volunteer", "skills"]
    }"#;

    #[test]
    fn test_legacy_links_become_leading_websites() {
        let data = import_from_json(LEGACY_SNAPSHOT).unwrap();
        assert_eq!(
            data.basics.websites,
            vec![
                Website {
                    name: "LinkedIn".to_string(),
                    url: "https://linkedin.com/in/jane".to_string()
                },
                Website {
                    name: "Blog".to_string(),
                    url: "https://jane.dev".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_custom_sections_upgraded() {
        let data = import_from_json(LEGACY_SNAPSHOT).unwrap();
        let talks: &CustomSection = &data.custom_sections[0];
        assert_eq!(talks.id, "custom-0");
        assert_eq!(talks.section_type, CustomSectionType::Bullets);
        assert_eq!(talks.items.len(), 2);
        assert_eq!(talks.items[0].title, "RustConf 2023");
        assert_eq!(talks.items[1].title, "FOSDEM");
        assert_eq!(data.custom_sections[1].section_type, CustomSectionType::Text);
    }

    #[test]
    fn test_sections_deduplicated_and_filtered() {
        let data = import_from_json(LEGACY_SNAPSHOT).unwrap();
        assert_eq!(
            data.sections,
            vec!["profile", "work", "custom-0", "custom-volunteer", "skills"]
        );
    }

    #[test]
    fn test_migration_is_idempotent() {
        let once = migrate(serde_json::from_str(LEGACY_SNAPSHOT).unwrap());
        let twice = migrate(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_export_import_round_trip_cleans_sections() {
        let mut data = import_from_json(LEGACY_SNAPSHOT).unwrap();
        data.sections.push("profile".to_string());
        data.sections.push("unknown".to_string());

        let restored = import_from_json(&export_to_json(&data).unwrap()).unwrap();
        assert_eq!(
            restored.sections,
            vec!["profile", "work", "custom-0", "custom-volunteer", "skills"]
        );
        assert_eq!(restored.basics, data.basics);
        assert_eq!(restored.custom_sections, data.custom_sections);
    }

    #[test]
    fn test_export_uses_camel_case_keys() {
        let json = export_to_json(&ResumeData::default()).unwrap();
        assert!(json.contains("\"customSections\""));
        assert!(json.contains("\"selectedTemplate\""));
    }

    #[test]
    fn test_malformed_json_is_invalid_format() {
        let err = import_from_json("{ not json").unwrap_err();
        assert!(matches!(err, IngestError::InvalidFormat(_)));
        assert!(err.to_string().starts_with("Invalid JSON format"));
    }

    #[test]
    fn test_wrong_shape_is_invalid_format() {
        let err = import_from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, IngestError::InvalidFormat(_)));
    }
}
