//! Zone Calculator: absolute rectangles for every editable field.
//!
//! Zones are derived from the pagination engine's page plans rather than from a
//! separate walk of the profile: each placed section is revisited at the `top` the
//! engine gave it, and its items are stepped through with the estimator's own
//! per-item heights. The overlay therefore lines up on every page, not just page 0.

use serde::{Deserialize, Serialize};

use crate::layout::metrics::LayoutMetrics;
use crate::layout::pagination::{PagePlan, PlacedSection};
use crate::layout::paper::{page_configuration, PageConfiguration, PaperFormat};
use crate::layout::plan_profile;
use crate::layout::sections::{DesignConfig, Language};
use crate::models::profile::{present, Profile};
use crate::models::section::{FieldFlow, FieldType, ItemField};

/// Absolute rectangle of one editable field, in page units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldZone {
    /// Stable identifier derived from `path`.
    pub id: String,
    /// Dotted/indexed path into the profile (`experiences[1].tasks[2]`).
    pub path: String,
    pub page_index: usize,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub multiline: bool,
    pub field_type: FieldType,
}

/// Stable zone id for a path: `experiences[1].tasks[2]` → `zone-experiences-1-tasks-2`.
pub fn zone_id(path: &str) -> String {
    let mut id = String::from("zone");
    let mut pending_dash = true;
    for c in path.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash {
                id.push('-');
                pending_dash = false;
            }
            id.push(c);
        } else {
            pending_dash = true;
        }
    }
    id
}

/// Zones for a whole profile.
///
/// A missing profile yields no zones. The profile is laid out with the same mapping,
/// estimator and engine the renderer path uses.
pub fn calculate_zones(
    profile: Option<&Profile>,
    design: &DesignConfig,
    paper: PaperFormat,
    language: Language,
) -> Vec<FieldZone> {
    let Some(profile) = profile else {
        return Vec::new();
    };
    let config = page_configuration(design.variant, paper);
    let pages = plan_profile(profile, design, config, language);
    zones_for_pages(profile, design, &pages, config)
}

/// Walks page plans and emits one zone per field, resetting the cursor per page.
pub fn zones_for_pages(
    profile: &Profile,
    design: &DesignConfig,
    pages: &[PagePlan],
    config: &PageConfiguration,
) -> Vec<FieldZone> {
    let metrics = LayoutMetrics::for_config(config);
    let mut zones = Vec::new();

    for page in pages {
        if page.header_footer.personal_header {
            personal_header_zones(profile, design, config, &metrics, page.index, &mut zones);
        }
        for part in &page.sections {
            section_zones(part, config, &metrics, page.index, &mut zones);
        }
    }
    zones
}

/// Header rows on page 0: name and job title always, contact fields and the photo
/// only when present.
fn personal_header_zones(
    profile: &Profile,
    design: &DesignConfig,
    config: &PageConfiguration,
    metrics: &LayoutMetrics,
    page_index: usize,
    zones: &mut Vec<FieldZone>,
) {
    let info = &profile.personal_info;
    let top = config.margins.top;
    let left = config.content_left();
    let mut text_width = config.content_width();

    let show_photo = design.show_photo && config.has_sidebar() && present(&info.photo).is_some();
    if show_photo {
        text_width -= metrics.photo_size + config.column_gap;
        zones.push(FieldZone {
            id: zone_id("personalInfo.photo"),
            path: "personalInfo.photo".to_string(),
            page_index,
            top,
            left: left + config.content_width() - metrics.photo_size,
            width: metrics.photo_size,
            height: metrics.photo_size,
            multiline: false,
            field_type: FieldType::Photo,
        });
    }

    let mut y = top;
    for (path, field_type, height) in [
        ("personalInfo.fullName", FieldType::Name, metrics.name_row),
        ("personalInfo.jobTitle", FieldType::JobTitle, metrics.job_title_row),
    ] {
        zones.push(FieldZone {
            id: zone_id(path),
            path: path.to_string(),
            page_index,
            top: y,
            left,
            width: text_width,
            height,
            multiline: false,
            field_type,
        });
        y += height;
    }

    let contacts = [
        ("personalInfo.email", FieldType::Email, &info.email),
        ("personalInfo.phone", FieldType::Phone, &info.phone),
        ("personalInfo.website", FieldType::Url, &info.website),
        ("personalInfo.address", FieldType::Address, &info.address),
    ];
    let slot_width = text_width / contacts.len() as f32;
    let mut slot = 0usize;
    for (path, field_type, value) in contacts {
        if present(value).is_none() {
            continue;
        }
        zones.push(FieldZone {
            id: zone_id(path),
            path: path.to_string(),
            page_index,
            top: y,
            left: left + slot as f32 * slot_width,
            width: slot_width,
            height: metrics.contact_row,
            multiline: false,
            field_type,
        });
        slot += 1;
    }
}

fn section_zones(
    part: &PlacedSection,
    config: &PageConfiguration,
    metrics: &LayoutMetrics,
    page_index: usize,
    zones: &mut Vec<FieldZone>,
) {
    let column_left = config.column_left(part.column);
    let column_width = config.column_width(part.column);
    let mut cursor = part.top;

    if part.show_title && part.header_height > 0.0 {
        if let Some(title_path) = &part.title_path {
            let title_height = metrics.section_title_row.min(part.header_height);
            zones.push(FieldZone {
                id: zone_id(title_path),
                path: title_path.clone(),
                page_index,
                top: part.top + part.header_height - title_height,
                left: column_left,
                width: column_width,
                height: title_height,
                multiline: false,
                field_type: FieldType::Heading,
            });
        }
        cursor += part.header_height;
    }

    for (item, item_height) in part.items.iter().zip(&part.item_heights) {
        let item_top = cursor;
        let mut y = item_top;
        // Row of the last block field; inline fields sit on it.
        let mut row: Option<(f32, f32)> = None;

        for field in &item.fields {
            let (top, height) = match field.flow {
                FieldFlow::Block => {
                    let height = metrics.field_height(field, part.column);
                    let top = y;
                    y += height;
                    row = Some((top, height));
                    (top, height)
                }
                FieldFlow::Inline => {
                    row.unwrap_or((y, metrics.row_height(field.field_type)))
                }
            };
            zones.push(field_zone(field, page_index, top, height, column_left, column_width));
        }
        cursor = item_top + item_height;
    }
}

fn field_zone(
    field: &ItemField,
    page_index: usize,
    top: f32,
    height: f32,
    column_left: f32,
    column_width: f32,
) -> FieldZone {
    FieldZone {
        id: zone_id(&field.path),
        path: field.path.clone(),
        page_index,
        top,
        left: column_left + column_width * field.x_ratio,
        width: column_width * field.width_ratio,
        height,
        multiline: field.multiline,
        field_type: field.field_type,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
