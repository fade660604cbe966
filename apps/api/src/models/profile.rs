use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A CV profile snapshot as sent by the editor.
///
/// Field names serialize as camelCase so that zone paths (`experiences[1].tasks[2]`)
/// address the same JSON the editor holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Photo reference (URL or data URI). Never measured, only positioned.
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<CustomItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Profile {
    /// Interprets raw editor JSON as a profile.
    ///
    /// Malformed data yields `None` rather than an error: the layout core treats an
    /// unreadable profile as "nothing to lay out".
    pub fn from_value(value: &Value) -> Option<Profile> {
        if !value.is_object() {
            return None;
        }
        match serde_json::from_value::<Profile>(value.clone()) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Profile data could not be read, laying out nothing: {e}");
                None
            }
        }
    }
}

/// Returns the trimmed text if it carries any content.
pub fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_camel_case_fields() {
        let value = json!({
            "personalInfo": { "fullName": "Ada Lovelace", "jobTitle": "Analyst" },
            "experiences": [{ "position": "Engineer", "company": "Engines Ltd", "tasks": ["Wrote notes"] }]
        });
        let profile = Profile::from_value(&value).expect("profile should parse");
        assert_eq!(profile.personal_info.full_name, "Ada Lovelace");
        assert_eq!(profile.experiences[0].tasks, vec!["Wrote notes".to_string()]);
        assert!(profile.summary.is_none());
    }

    #[test]
    fn test_from_value_malformed_is_none() {
        assert!(Profile::from_value(&json!(null)).is_none());
        assert!(Profile::from_value(&json!([1, 2, 3])).is_none());
        assert!(Profile::from_value(&json!({ "experiences": "not a list" })).is_none());
    }

    #[test]
    fn test_present_ignores_blank_text() {
        assert_eq!(present(&Some("  ".to_string())), None);
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some(" mail@x.io ".to_string())), Some("mail@x.io"));
    }
}
