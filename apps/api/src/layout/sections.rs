//! Maps a profile snapshot to the ordered content sections the engine lays out.
//!
//! Every editable field becomes an `ItemField` slot with an index-qualified path, so
//! the same slots drive both height estimation and overlay zones.

use serde::{Deserialize, Serialize};

use crate::layout::estimator::estimate_all;
use crate::layout::metrics::LayoutMetrics;
use crate::layout::paper::{Column, LayoutVariant, PageConfiguration};
use crate::models::profile::{present, Profile};
use crate::models::section::{
    ContentSection, FieldFlow, FieldType, ItemField, SectionItem, SectionKind, SplitPolicy,
};

/// Language used for the fixed section titles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    De,
}

/// User-facing design choices that affect layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    #[serde(default)]
    pub variant: LayoutVariant,
    #[serde(default = "default_show_photo")]
    pub show_photo: bool,
    /// Explicit section order; kinds not listed keep their default relative order
    /// after the listed ones.
    #[serde(default)]
    pub section_order: Option<Vec<SectionKind>>,
    #[serde(default)]
    pub hidden_sections: Vec<SectionKind>,
}

fn default_show_photo() -> bool {
    true
}

impl Default for DesignConfig {
    fn default() -> Self {
        DesignConfig {
            variant: LayoutVariant::default(),
            show_photo: default_show_photo(),
            section_order: None,
            hidden_sections: Vec::new(),
        }
    }
}

const DEFAULT_ORDER: &[SectionKind] = &[
    SectionKind::Profile,
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Skills,
    SectionKind::Languages,
    SectionKind::Custom,
];

/// Fixed title of a standard section. Custom sections carry their own title.
pub fn section_title(kind: SectionKind, language: Language) -> &'static str {
    match (kind, language) {
        (SectionKind::Profile, _) => "",
        (SectionKind::Experience, Language::En) => "Experience",
        (SectionKind::Experience, Language::Fr) => "Expérience professionnelle",
        (SectionKind::Experience, Language::De) => "Berufserfahrung",
        (SectionKind::Education, Language::En) => "Education",
        (SectionKind::Education, Language::Fr) => "Formation",
        (SectionKind::Education, Language::De) => "Ausbildung",
        (SectionKind::Skills, Language::En) => "Skills",
        (SectionKind::Skills, Language::Fr) => "Compétences",
        (SectionKind::Skills, Language::De) => "Kenntnisse",
        (SectionKind::Languages, Language::En) => "Languages",
        (SectionKind::Languages, Language::Fr) => "Langues",
        (SectionKind::Languages, Language::De) => "Sprachen",
        (SectionKind::Custom, _) => "",
    }
}

/// Resolves the kind order from the design, appending kinds it leaves out.
fn ordered_kinds(design: &DesignConfig) -> Vec<SectionKind> {
    let mut order: Vec<SectionKind> = Vec::with_capacity(DEFAULT_ORDER.len());
    if let Some(explicit) = &design.section_order {
        for kind in explicit {
            if !order.contains(kind) {
                order.push(*kind);
            }
        }
    }
    for kind in DEFAULT_ORDER {
        if !order.contains(kind) {
            order.push(*kind);
        }
    }
    order
}

/// Builds the estimated sections for a profile, in layout order.
pub fn build_sections(
    profile: &Profile,
    design: &DesignConfig,
    config: &PageConfiguration,
    language: Language,
) -> Vec<ContentSection> {
    let mut sections = Vec::new();
    for kind in ordered_kinds(design) {
        let visible = !design.hidden_sections.contains(&kind);
        let mut built = match kind {
            SectionKind::Profile => vec![summary_section(profile)],
            SectionKind::Experience => vec![experience_section(profile, language)],
            SectionKind::Education => vec![education_section(profile, language)],
            SectionKind::Skills => vec![skills_section(profile, config, language)],
            SectionKind::Languages => vec![languages_section(profile, language)],
            SectionKind::Custom => custom_sections(profile),
        };
        for section in &mut built {
            section.is_visible = visible;
            section.column = config.effective_column(section.column);
        }
        sections.extend(built);
    }

    let metrics = LayoutMetrics::for_config(config);
    estimate_all(&mut sections, &metrics);
    sections
}

fn summary_section(profile: &Profile) -> ContentSection {
    let mut section = ContentSection::new("profile", SectionKind::Profile, "");
    if let Some(summary) = present(&profile.summary) {
        section.items.push(SectionItem {
            path: "summary".to_string(),
            fields: vec![ItemField::block("summary", FieldType::RichText, summary).multiline()],
        });
    }
    section
}

fn experience_section(profile: &Profile, language: Language) -> ContentSection {
    let mut section = ContentSection::new(
        "experience",
        SectionKind::Experience,
        section_title(SectionKind::Experience, language),
    );
    section.split_policy = SplitPolicy::ByItem;
    for (i, exp) in profile.experiences.iter().enumerate() {
        let base = format!("experiences[{i}]");
        let mut fields = vec![
            ItemField::block(format!("{base}.position"), FieldType::Heading, &exp.position)
                .span(0.0, 0.62),
        ];
        push_dates(&mut fields, &base, &exp.start_date, &exp.end_date);
        fields.push(
            ItemField::block(format!("{base}.company"), FieldType::Text, &exp.company)
                .span(0.0, 0.6),
        );
        if let Some(location) = present(&exp.location) {
            fields.push(
                ItemField::inline(format!("{base}.location"), FieldType::Address, location)
                    .span(0.62, 0.38),
            );
        }
        if let Some(description) = present(&exp.description) {
            fields.push(
                ItemField::block(format!("{base}.description"), FieldType::RichText, description)
                    .multiline(),
            );
        }
        for (t, task) in exp.tasks.iter().enumerate() {
            if task.trim().is_empty() {
                continue;
            }
            fields.push(
                ItemField::block(format!("{base}.tasks[{t}]"), FieldType::Text, task)
                    .multiline()
                    .span(0.04, 0.96),
            );
        }
        section.items.push(SectionItem { path: base, fields });
    }
    section
}

fn education_section(profile: &Profile, language: Language) -> ContentSection {
    let mut section = ContentSection::new(
        "education",
        SectionKind::Education,
        section_title(SectionKind::Education, language),
    );
    section.split_policy = SplitPolicy::ByItem;
    for (i, edu) in profile.education.iter().enumerate() {
        let base = format!("education[{i}]");
        let mut fields = vec![
            ItemField::block(format!("{base}.degree"), FieldType::Heading, &edu.degree)
                .span(0.0, 0.62),
        ];
        push_dates(&mut fields, &base, &edu.start_date, &edu.end_date);
        fields.push(
            ItemField::block(format!("{base}.institution"), FieldType::Text, &edu.institution)
                .span(0.0, 0.6),
        );
        if let Some(location) = present(&edu.location) {
            fields.push(
                ItemField::inline(format!("{base}.location"), FieldType::Address, location)
                    .span(0.62, 0.38),
            );
        }
        if let Some(description) = present(&edu.description) {
            fields.push(
                ItemField::block(format!("{base}.description"), FieldType::RichText, description)
                    .multiline(),
            );
        }
        section.items.push(SectionItem { path: base, fields });
    }
    section
}

/// Start/end dates share the heading row, right of the 62% heading slot.
fn push_dates(
    fields: &mut Vec<ItemField>,
    base: &str,
    start: &Option<String>,
    end: &Option<String>,
) {
    if let Some(start) = present(start) {
        fields.push(
            ItemField::inline(format!("{base}.startDate"), FieldType::Date, start).span(0.64, 0.17),
        );
    }
    if let Some(end) = present(end) {
        fields.push(
            ItemField::inline(format!("{base}.endDate"), FieldType::Date, end).span(0.83, 0.17),
        );
    }
}

/// Visual layouts list one skill per sidebar row. ATS layouts print the names as a
/// comma-separated paragraph, but each name keeps its own `skills[i].name` slot so
/// overlay edits land on a string field.
fn skills_section(profile: &Profile, config: &PageConfiguration, language: Language) -> ContentSection {
    let mut section = ContentSection::new(
        "skills",
        SectionKind::Skills,
        section_title(SectionKind::Skills, language),
    );
    if profile.skills.iter().all(|s| s.name.trim().is_empty()) {
        return section;
    }

    if config.has_sidebar() {
        section.column = Column::Sidebar;
        section.split_policy = SplitPolicy::ByGroup;
        for (i, skill) in profile.skills.iter().enumerate() {
            if skill.name.trim().is_empty() {
                continue;
            }
            let base = format!("skills[{i}]");
            let mut fields = vec![
                ItemField::block(format!("{base}.name"), FieldType::Skill, &skill.name).span(0.0, 0.6),
            ];
            if let Some(level) = present(&skill.level) {
                fields.push(
                    ItemField::inline(format!("{base}.level"), FieldType::Text, level).span(0.6, 0.4),
                );
            }
            section.items.push(SectionItem { path: base, fields });
        }
    } else {
        let per_line = LayoutMetrics::for_config(config).chars_per_line(Column::Main, 1.0);
        section.items.push(SectionItem {
            path: "skills".to_string(),
            fields: skill_paragraph(profile, per_line),
        });
    }
    section
}

/// Separator printed between skill names (`", "`).
const SKILL_SEPARATOR_LEN: usize = 2;

/// Packs skill names into paragraph lines of `per_line` characters.
///
/// The first name on a line is a block field (it opens the row), the rest sit
/// inline on it at their character offset. A name longer than a line gets a
/// wrapped row of its own.
fn skill_paragraph(profile: &Profile, per_line: usize) -> Vec<ItemField> {
    let per_line = per_line.max(1);
    let ratio = |chars: usize| chars as f32 / per_line as f32;
    let mut fields = Vec::new();
    // Characters already used on the current line; 0 means a fresh line.
    let mut used = 0usize;

    for (i, skill) in profile.skills.iter().enumerate() {
        let name = skill.name.trim();
        if name.is_empty() {
            continue;
        }
        let len = name.chars().count();
        let path = format!("skills[{i}].name");

        if len >= per_line {
            fields.push(ItemField::block(path, FieldType::SkillsList, name).multiline());
            used = per_line;
        } else if used == 0 || used + len > per_line {
            fields.push(ItemField::block(path, FieldType::SkillsList, name).span(0.0, ratio(len)));
            used = len + SKILL_SEPARATOR_LEN;
        } else {
            fields.push(
                ItemField::inline(path, FieldType::SkillsList, name).span(ratio(used), ratio(len)),
            );
            used += len + SKILL_SEPARATOR_LEN;
        }
    }
    fields
}

fn languages_section(profile: &Profile, language: Language) -> ContentSection {
    let mut section = ContentSection::new(
        "languages",
        SectionKind::Languages,
        section_title(SectionKind::Languages, language),
    );
    section.column = Column::Sidebar;
    section.split_policy = SplitPolicy::ByGroup;
    for (i, lang) in profile.languages.iter().enumerate() {
        if lang.name.trim().is_empty() {
            continue;
        }
        let base = format!("languages[{i}]");
        let mut fields = vec![
            ItemField::block(format!("{base}.name"), FieldType::Language, &lang.name).span(0.0, 0.6),
        ];
        if let Some(level) = present(&lang.level) {
            fields.push(
                ItemField::inline(format!("{base}.level"), FieldType::Text, level).span(0.6, 0.4),
            );
        }
        section.items.push(SectionItem { path: base, fields });
    }
    section
}

fn custom_sections(profile: &Profile) -> Vec<ContentSection> {
    profile
        .custom_sections
        .iter()
        .enumerate()
        .map(|(k, custom)| {
            let mut section = ContentSection::new(
                format!("custom-{k}"),
                SectionKind::Custom,
                custom.title.trim(),
            );
            section.title_path = Some(format!("customSections[{k}].title"));
            section.split_policy = SplitPolicy::ByItem;
            for (j, item) in custom.items.iter().enumerate() {
                let base = format!("customSections[{k}].items[{j}]");
                let mut fields = vec![ItemField::block(
                    format!("{base}.title"),
                    FieldType::Heading,
                    &item.title,
                )];
                if let Some(subtitle) = present(&item.subtitle) {
                    fields.push(ItemField::block(format!("{base}.subtitle"), FieldType::Text, subtitle));
                }
                if let Some(description) = present(&item.description) {
                    fields.push(
                        ItemField::block(format!("{base}.description"), FieldType::RichText, description)
                            .multiline(),
                    );
                }
                section.items.push(SectionItem { path: base, fields });
            }
            section
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paper::{page_configuration, PaperFormat};
    use crate::models::profile::{CustomItem, CustomSection, Experience, Skill};

    fn visual() -> &'static PageConfiguration {
        page_configuration(LayoutVariant::Visual, PaperFormat::A4)
    }

    fn ats() -> &'static PageConfiguration {
        page_configuration(LayoutVariant::Ats, PaperFormat::A4)
    }

    fn sample_profile() -> Profile {
        Profile {
            summary: Some("Systems engineer focused on storage engines.".to_string()),
            experiences: vec![Experience {
                position: "Staff Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: Some("2019".to_string()),
                tasks: vec!["Built the WAL".to_string(), " ".to_string(), "Led oncall".to_string()],
                ..Default::default()
            }],
            skills: vec![
                Skill {
                    name: "Rust".to_string(),
                    level: Some("Expert".to_string()),
                },
                Skill {
                    name: "SQL".to_string(),
                    level: None,
                },
            ],
            ..Default::default()
        }
    }

    fn find<'a>(sections: &'a [ContentSection], id: &str) -> &'a ContentSection {
        sections.iter().find(|s| s.id == id).unwrap()
    }

    #[test]
    fn test_default_order_and_estimates() {
        let sections = build_sections(&sample_profile(), &DesignConfig::default(), visual(), Language::En);
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["profile", "experience", "education", "skills", "languages"]);
        assert!(find(&sections, "profile").estimated_height > 0.0);
        assert_eq!(find(&sections, "education").estimated_height, 0.0);
    }

    #[test]
    fn test_experience_paths_are_index_qualified() {
        let sections = build_sections(&sample_profile(), &DesignConfig::default(), visual(), Language::En);
        let exp = find(&sections, "experience");
        let paths: Vec<&str> = exp.items[0].fields.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "experiences[0].position",
                "experiences[0].startDate",
                "experiences[0].company",
                "experiences[0].tasks[0]",
                "experiences[0].tasks[2]",
            ]
        );
        assert_eq!(exp.split_policy, SplitPolicy::ByItem);
    }

    #[test]
    fn test_skills_sidebar_in_visual_paragraph_in_ats() {
        let profile = sample_profile();
        let v = build_sections(&profile, &DesignConfig::default(), visual(), Language::En);
        let skills = find(&v, "skills");
        assert_eq!(skills.column, Column::Sidebar);
        assert_eq!(skills.items.len(), 2);

        let design = DesignConfig {
            variant: LayoutVariant::Ats,
            ..Default::default()
        };
        let a = build_sections(&profile, &design, ats(), Language::En);
        let skills = find(&a, "skills");
        assert_eq!(skills.column, Column::Main);
        assert_eq!(skills.items.len(), 1);
        let fields = &skills.items[0].fields;
        let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["skills[0].name", "skills[1].name"]);
        assert!(fields.iter().all(|f| f.field_type == FieldType::SkillsList));
        // Both names share the paragraph's first row.
        assert_eq!(fields[0].flow, FieldFlow::Block);
        assert_eq!(fields[1].flow, FieldFlow::Inline);
        assert!(fields[0].x_ratio + fields[0].width_ratio <= fields[1].x_ratio);
    }

    #[test]
    fn test_skill_paragraph_wraps_into_rows() {
        let names = ["Kubernetes", "Terraform", "", "PostgreSQL", "A".repeat(40).as_str()]
            .iter()
            .map(|n| Skill {
                name: n.to_string(),
                level: None,
            })
            .collect();
        let profile = Profile {
            skills: names,
            ..Default::default()
        };
        // 24 characters per line: "Kubernetes, Terraform" fills the first row.
        let fields = skill_paragraph(&profile, 24);
        let rows: Vec<(&str, FieldFlow, bool)> = fields
            .iter()
            .map(|f| (f.path.as_str(), f.flow, f.multiline))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("skills[0].name", FieldFlow::Block, false),
                ("skills[1].name", FieldFlow::Inline, false),
                ("skills[3].name", FieldFlow::Block, false),
                ("skills[4].name", FieldFlow::Block, true),
            ]
        );
        assert!(fields.iter().all(|f| f.x_ratio + f.width_ratio <= 1.0 + 1e-6));
    }

    #[test]
    fn test_section_order_and_hidden_sections() {
        let design = DesignConfig {
            section_order: Some(vec![SectionKind::Skills, SectionKind::Experience]),
            hidden_sections: vec![SectionKind::Profile],
            ..Default::default()
        };
        let sections = build_sections(&sample_profile(), &design, visual(), Language::En);
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids[..3], ["skills", "experience", "profile"]);
        let summary = find(&sections, "profile");
        assert!(!summary.is_visible);
        assert_eq!(summary.estimated_height, 0.0);
    }

    #[test]
    fn test_localized_titles() {
        let sections = build_sections(&sample_profile(), &DesignConfig::default(), visual(), Language::Fr);
        assert_eq!(find(&sections, "experience").title, "Expérience professionnelle");
        assert_eq!(find(&sections, "languages").title, "Langues");
    }

    #[test]
    fn test_custom_sections_carry_title_path() {
        let profile = Profile {
            custom_sections: vec![CustomSection {
                title: "Talks".to_string(),
                items: vec![CustomItem {
                    title: "RustConf".to_string(),
                    subtitle: None,
                    description: Some("Async drop".to_string()),
                }],
            }],
            ..Default::default()
        };
        let sections = build_sections(&profile, &DesignConfig::default(), visual(), Language::En);
        let custom = find(&sections, "custom-0");
        assert_eq!(custom.title_path.as_deref(), Some("customSections[0].title"));
        assert_eq!(custom.items[0].fields.len(), 2);
        assert_eq!(custom.items[0].fields[1].path, "customSections[0].items[0].description");
    }
}
