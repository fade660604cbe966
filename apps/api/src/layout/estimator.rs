//! Height Estimator: approximate pixel height of a content section.
//!
//! Estimates are coarse: text wraps at a fixed characters-per-line figure derived from
//! the column width, because real wrapping is only known at render time. The
//! pagination engine tolerates both under- and over-estimation.

use crate::layout::metrics::LayoutMetrics;
use crate::models::section::{ContentSection, SectionItem};

/// Estimated height of a whole section.
///
/// Invisible sections and sections with no items are 0, so the engine skips them
/// instead of reserving space for a bare title.
pub fn estimate(section: &ContentSection, metrics: &LayoutMetrics) -> f32 {
    if !section.is_visible || section.items.is_empty() {
        return 0.0;
    }
    header_height(section, metrics) + item_heights(section, metrics).iter().sum::<f32>()
}

/// Title cost of a section; untitled sections (the summary paragraph) pay none.
pub fn header_height(section: &ContentSection, metrics: &LayoutMetrics) -> f32 {
    if section.title.trim().is_empty() {
        0.0
    } else {
        metrics.section_header_height()
    }
}

/// Per-item heights, each estimated from the item's own fields.
pub fn item_heights(section: &ContentSection, metrics: &LayoutMetrics) -> Vec<f32> {
    section
        .items
        .iter()
        .map(|item| item_height(section, item, metrics))
        .collect()
}

/// Height of one item: its block rows plus the gap that follows it.
pub fn item_height(section: &ContentSection, item: &SectionItem, metrics: &LayoutMetrics) -> f32 {
    let rows: f32 = item
        .fields
        .iter()
        .map(|field| metrics.field_height(field, section.column))
        .sum();
    rows + metrics.item_gap_for(section.kind)
}

/// Fills estimated, header and per-item heights on freshly mapped sections.
pub fn estimate_all(sections: &mut [ContentSection], metrics: &LayoutMetrics) {
    for section in sections.iter_mut() {
        section.estimated_height = estimate(section, metrics);
        if section.estimated_height > 0.0 {
            section.header_height = header_height(section, metrics);
            section.item_heights = item_heights(section, metrics);
        } else {
            section.header_height = 0.0;
            section.item_heights.clear();
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
