//! Shared layout metrics: the row heights every editable field occupies.
//!
//! The height estimator sums these to size sections for pagination, and the zone
//! calculator walks them to position overlay rectangles. Both call `field_height`
//! from here so that a change to a row height moves the page plan and the overlay
//! together.
//!
//! Widths are coarse: a line holds `column_width / avg_char_width` characters. Real
//! wrapping depends on glyph shapes the renderer owns.

use serde::Serialize;

use crate::layout::paper::{Column, PageConfiguration};
use crate::models::section::{FieldFlow, FieldType, ItemField, SectionKind};

/// Fallback per-item height when a section reports no items.
pub const DEFAULT_ITEM_HEIGHT: f32 = 40.0;

// Unscaled base values (font scale 1.0).
const NAME_ROW: f32 = 36.0;
const JOB_TITLE_ROW: f32 = 22.0;
const CONTACT_ROW: f32 = 18.0;
const HEADING_ROW: f32 = 20.0;
const META_ROW: f32 = 17.0;
const LINE_HEIGHT: f32 = 16.0;
const COMPACT_ROW: f32 = 20.0;
const SECTION_SPACING: f32 = 14.0;
const SECTION_TITLE_ROW: f32 = 22.0;
const ITEM_GAP: f32 = 10.0;
const COMPACT_ITEM_GAP: f32 = 2.0;
const PHOTO_SIZE: f32 = 110.0;
const AVG_CHAR_WIDTH: f32 = 6.6;

/// Row heights and character widths resolved for one page configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutMetrics {
    pub name_row: f32,
    pub job_title_row: f32,
    pub contact_row: f32,
    pub heading_row: f32,
    pub meta_row: f32,
    pub line_height: f32,
    pub compact_row: f32,
    /// Space above a section title.
    pub section_spacing: f32,
    pub section_title_row: f32,
    pub item_gap: f32,
    pub compact_item_gap: f32,
    pub photo_size: f32,
    pub avg_char_width: f32,
    main_width: f32,
    sidebar_width: f32,
}

impl LayoutMetrics {
    pub fn for_config(config: &PageConfiguration) -> Self {
        let s = config.font_scale;
        LayoutMetrics {
            name_row: NAME_ROW * s,
            job_title_row: JOB_TITLE_ROW * s,
            contact_row: CONTACT_ROW * s,
            heading_row: HEADING_ROW * s,
            meta_row: META_ROW * s,
            line_height: LINE_HEIGHT * s,
            compact_row: COMPACT_ROW * s,
            section_spacing: SECTION_SPACING * s,
            section_title_row: SECTION_TITLE_ROW * s,
            item_gap: ITEM_GAP * s,
            compact_item_gap: COMPACT_ITEM_GAP * s,
            photo_size: PHOTO_SIZE,
            avg_char_width: AVG_CHAR_WIDTH * s,
            main_width: config.column_width(Column::Main),
            sidebar_width: config.column_width(Column::Sidebar),
        }
    }

    /// Header cost of a titled section: spacing above plus the title row.
    pub fn section_header_height(&self) -> f32 {
        self.section_spacing + self.section_title_row
    }

    /// Gap charged after each item of a section of this kind.
    pub fn item_gap_for(&self, kind: SectionKind) -> f32 {
        match kind {
            SectionKind::Skills | SectionKind::Languages => self.compact_item_gap,
            _ => self.item_gap,
        }
    }

    /// Characters that fit on one line of a field spanning `width_ratio` of a column.
    pub fn chars_per_line(&self, column: Column, width_ratio: f32) -> usize {
        let width = match column {
            Column::Main => self.main_width,
            Column::Sidebar => self.sidebar_width,
        };
        ((width * width_ratio) / self.avg_char_width).floor().max(1.0) as usize
    }

    /// Height of a single-line row for a field type.
    pub fn row_height(&self, field_type: FieldType) -> f32 {
        match field_type {
            FieldType::Name => self.name_row,
            FieldType::JobTitle => self.job_title_row,
            FieldType::Email | FieldType::Phone | FieldType::Url | FieldType::Address => {
                self.contact_row
            }
            FieldType::Heading => self.heading_row,
            FieldType::Date => self.meta_row,
            FieldType::Skill | FieldType::Language => self.compact_row,
            FieldType::Photo => self.photo_size,
            FieldType::Text | FieldType::SkillsList | FieldType::RichText => self.line_height,
        }
    }

    /// Number of wrapped lines for `text_len` characters (at least one).
    pub fn wrapped_lines(&self, text_len: usize, column: Column, width_ratio: f32) -> usize {
        let per_line = self.chars_per_line(column, width_ratio);
        text_len.div_ceil(per_line).max(1)
    }

    /// Vertical space a field takes. Inline fields share the preceding row and take none.
    pub fn field_height(&self, field: &ItemField, column: Column) -> f32 {
        match field.flow {
            FieldFlow::Inline => 0.0,
            FieldFlow::Block if field.multiline => {
                self.wrapped_lines(field.text_len, column, field.width_ratio) as f32
                    * self.line_height
            }
            FieldFlow::Block => self.row_height(field.field_type),
        }
    }

    /// Height of the three personal-info rows at the top of the first page.
    pub fn personal_header_rows(&self) -> f32 {
        self.name_row + self.job_title_row + self.contact_row
    }
}
