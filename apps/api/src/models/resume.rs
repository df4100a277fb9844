use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full résumé document as the editor persists and exports it.
///
/// Every field has a serde default so older or hand-written snapshots still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub basics: Basics,
    pub education: Vec<Education>,
    pub work: Vec<WorkExperience>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub awards: Vec<Award>,
    pub custom_sections: Vec<CustomSection>,
    /// Ordered section ids: the built-in keys plus custom section ids.
    pub sections: Vec<String>,
    pub selected_template: u32,
    /// Owned by the rendering layer; carried through untouched.
    pub formatting: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Basics {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub summary: String,
    pub websites: Vec<Website>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub name: String,
    pub url: String,
}

/// A job entry. `bullets` is never empty once produced by ingestion:
/// an entry without detected bullets holds a single `""` placeholder row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub graduation_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub bullets: Vec<String>,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    pub title: String,
    pub awarder: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomSectionType {
    #[default]
    Bullets,
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub section_type: CustomSectionType,
    pub items: Vec<CustomSectionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSectionEntry {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub location: String,
    pub link: String,
    pub bullets: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Partial output of the ingestion pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Contact details recovered from an imported document.
///
/// `None` means "not found"; the caller keeps its existing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialBasics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub websites: Vec<Website>,
}

/// Best-effort structured résumé produced by one ingestion call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialResumeData {
    pub basics: PartialBasics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub work: Vec<WorkExperience>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<Education>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<Skill>,
}

impl WorkExperience {
    pub fn with_company(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            ..Default::default()
        }
    }

    /// Enforces the placeholder-bullet invariant.
    pub fn ensure_bullet_row(&mut self) {
        if self.bullets.is_empty() {
            self.bullets.push(String::new());
        }
    }
}

impl Education {
    pub fn with_institution(institution: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_experience_serializes_camel_case() {
        let work = WorkExperience {
            company: "Acme".to_string(),
            start_date: "Jan 2020".to_string(),
            end_date: "Present".to_string(),
            bullets: vec!["Built things".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&work).unwrap();
        assert_eq!(json["startDate"], "Jan 2020");
        assert_eq!(json["endDate"], "Present");
        assert!(json.get("start_date").is_none());
    }

    #[test]
    fn test_partial_basics_skips_missing_fields() {
        let basics = PartialBasics {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&basics).unwrap();
        assert_eq!(json["name"], "Jane Doe");
        assert!(json.get("email").is_none());
        assert!(json.get("websites").is_none());
    }

    #[test]
    fn test_resume_data_fills_defaults_for_missing_fields() {
        let data: ResumeData = serde_json::from_str(r#"{"basics": {"name": "Jane"}}"#).unwrap();
        assert_eq!(data.basics.name, "Jane");
        assert!(data.work.is_empty());
        assert!(data.sections.is_empty());
        assert_eq!(data.selected_template, 0);
    }

    #[test]
    fn test_custom_section_type_round_trips_as_lowercase() {
        let json = r#"{"id": "custom-0", "title": "Talks", "type": "text", "items": []}"#;
        let section: CustomSection = serde_json::from_str(json).unwrap();
        assert_eq!(section.section_type, CustomSectionType::Text);
        let back = serde_json::to_value(&section).unwrap();
        assert_eq!(back["type"], "text");
    }

    #[test]
    fn test_ensure_bullet_row_adds_single_placeholder() {
        let mut work = WorkExperience::with_company("Acme");
        work.ensure_bullet_row();
        work.ensure_bullet_row();
        assert_eq!(work.bullets, vec![String::new()]);
    }
}
