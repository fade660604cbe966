use serde::{Deserialize, Serialize};

use crate::layout::paper::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Profile,
    Experience,
    Education,
    Skills,
    Languages,
    Custom,
}

/// How a section may be divided across pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitPolicy {
    #[default]
    None,
    ByItem,
    ByGroup,
    /// Any policy name this engine does not know. Laid out like `None`.
    #[serde(other)]
    Unrecognized,
}

/// Semantic type of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Heading,
    Name,
    JobTitle,
    Photo,
    Email,
    Phone,
    Url,
    Address,
    Date,
    SkillsList,
    Skill,
    Language,
    RichText,
}

/// Whether a field starts a new row or shares the row of the preceding block field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFlow {
    Block,
    Inline,
}

/// One editable field slot inside a section item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemField {
    pub path: String,
    pub field_type: FieldType,
    /// Character count of the current value, used for wrap estimation.
    pub text_len: usize,
    pub multiline: bool,
    pub flow: FieldFlow,
    /// Horizontal offset as a fraction of the column width.
    pub x_ratio: f32,
    /// Width as a fraction of the column width.
    pub width_ratio: f32,
}

impl ItemField {
    pub fn block(path: impl Into<String>, field_type: FieldType, text: &str) -> Self {
        ItemField {
            path: path.into(),
            field_type,
            text_len: text.chars().count(),
            multiline: false,
            flow: FieldFlow::Block,
            x_ratio: 0.0,
            width_ratio: 1.0,
        }
    }

    pub fn inline(path: impl Into<String>, field_type: FieldType, text: &str) -> Self {
        ItemField {
            flow: FieldFlow::Inline,
            ..ItemField::block(path, field_type, text)
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn span(mut self, x_ratio: f32, width_ratio: f32) -> Self {
        self.x_ratio = x_ratio;
        self.width_ratio = width_ratio;
        self
    }
}

/// One entry of a section (an experience, a skill, the summary paragraph...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionItem {
    /// Path of the entry in the profile, e.g. `experiences[1]`.
    pub path: String,
    #[serde(default)]
    pub fields: Vec<ItemField>,
}

/// A layout unit handed to the pagination engine.
///
/// Built by the mapping layer from a profile snapshot; the engine reads it but never
/// mutates it. `header_height` and `item_heights` are filled by the height estimator;
/// sections built by other callers may leave them empty, in which case the splitter
/// falls back to a uniform per-item height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub id: String,
    pub kind: SectionKind,
    pub title: String,
    /// Editable title path (custom sections only).
    #[serde(default)]
    pub title_path: Option<String>,
    #[serde(default)]
    pub column: Column,
    #[serde(default)]
    pub items: Vec<SectionItem>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub estimated_height: f32,
    #[serde(default)]
    pub split_policy: SplitPolicy,
    #[serde(default)]
    pub header_height: f32,
    #[serde(default)]
    pub item_heights: Vec<f32>,
}

fn default_visible() -> bool {
    true
}

impl ContentSection {
    pub fn new(id: impl Into<String>, kind: SectionKind, title: impl Into<String>) -> Self {
        ContentSection {
            id: id.into(),
            kind,
            title: title.into(),
            title_path: None,
            column: Column::Main,
            items: Vec::new(),
            is_visible: true,
            estimated_height: 0.0,
            split_policy: SplitPolicy::None,
            header_height: 0.0,
            item_heights: Vec::new(),
        }
    }

    /// True when the section takes no space at all and must be skipped.
    pub fn is_empty_for_layout(&self) -> bool {
        !self.is_visible || self.estimated_height <= 0.0
    }
}
