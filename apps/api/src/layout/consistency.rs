//! Cross-checks overlay zones against the page plans they were derived from.
//!
//! The plans are walked once more to rebuild the slot every field should occupy:
//! its page, its row inside the placed item and its share of the column. Each
//! zone must be unique, sit on a page that exists, stay inside the page box and
//! match its slot within the tolerance. Every slot must have a zone. Violations
//! are reported as drifts and logged; whether they fail a request is up to the
//! caller (`STRICT_ZONE_CONSISTENCY`).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::metrics::LayoutMetrics;
use crate::layout::pagination::PagePlan;
use crate::layout::paper::PageConfiguration;
use crate::layout::zones::FieldZone;
use crate::models::section::FieldFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftReason {
    /// The zone names a page the plans do not contain.
    UnknownPage,
    /// The zone leaves the page box or the horizontal content area.
    OutsidePage,
    /// The zone is not where the plans put its field: wrong page, row or span.
    Misplaced,
    /// A header zone falls outside the first-page header band.
    OutsideHeader,
    /// No placed field or title has the zone's path.
    Orphan,
    /// A placed field or title has no zone.
    MissingZone,
    /// More than one zone addresses the same path.
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDrift {
    pub path: String,
    pub page_index: usize,
    pub reason: DriftReason,
    /// Largest offset from the allowed position (0 when not positional).
    pub delta: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub checked: usize,
    pub drifts: Vec<ZoneDrift>,
    pub passed: bool,
}

/// Rectangle the plans reserve for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    page_index: usize,
    top: f32,
    left: f32,
    width: f32,
    height: f32,
}

impl Slot {
    /// Largest edge offset between this slot and `zone`.
    fn offset(&self, zone: &FieldZone) -> f32 {
        (zone.top - self.top)
            .abs()
            .max((zone.height - self.height).abs())
            .max((zone.left - self.left).abs())
            .max((zone.width - self.width).abs())
    }
}

/// Compares `zones` with `plans`; differences within `tolerance` page units pass.
pub fn verify_zones(
    plans: &[PagePlan],
    zones: &[FieldZone],
    config: &PageConfiguration,
    tolerance: f32,
) -> ConsistencyReport {
    let slots = expected_slots(plans, config);
    let (header_top, header_bottom) = (config.margins.top, config.content_top(0));
    let mut drifts = Vec::new();
    let mut drift = |zone: &FieldZone, reason: DriftReason, delta: f32| {
        drifts.push(ZoneDrift {
            path: zone.path.clone(),
            page_index: zone.page_index,
            reason,
            delta,
        });
    };

    let mut seen = HashSet::new();
    for zone in zones {
        if !seen.insert(zone.path.as_str()) {
            drift(zone, DriftReason::Duplicate, 0.0);
            continue;
        }
        if zone.page_index >= plans.len() {
            drift(zone, DriftReason::UnknownPage, 0.0);
            continue;
        }

        let bottom = zone.top + zone.height;
        let content_right = config.content_left() + config.content_width();
        let page_overshoot = (config.content_left() - zone.left)
            .max(zone.left + zone.width - content_right)
            .max(-zone.top)
            .max(bottom - config.height)
            .max(0.0);
        if page_overshoot > tolerance {
            drift(zone, DriftReason::OutsidePage, page_overshoot);
            continue;
        }

        if zone.path.starts_with("personalInfo.") {
            let delta = (header_top - zone.top).max(bottom - header_bottom).max(0.0);
            if zone.page_index != 0 || delta > tolerance {
                drift(zone, DriftReason::OutsideHeader, delta);
            }
            continue;
        }

        match slots.get(zone.path.as_str()) {
            None => drift(zone, DriftReason::Orphan, 0.0),
            Some(slot) => {
                let delta = slot.offset(zone);
                if slot.page_index != zone.page_index || delta > tolerance {
                    drift(zone, DriftReason::Misplaced, delta);
                }
            }
        }
    }

    for (path, slot) in &slots {
        if !seen.contains(path) {
            drifts.push(ZoneDrift {
                path: path.to_string(),
                page_index: slot.page_index,
                reason: DriftReason::MissingZone,
                delta: 0.0,
            });
        }
    }
    drifts.sort_by(|a, b| a.page_index.cmp(&b.page_index).then_with(|| a.path.cmp(&b.path)));

    for d in &drifts {
        warn!(
            path = %d.path,
            page = d.page_index,
            reason = ?d.reason,
            delta = d.delta,
            "Zone drifted from page plan"
        );
    }

    ConsistencyReport {
        checked: zones.len(),
        passed: drifts.is_empty(),
        drifts,
    }
}

/// Slot of every title and field the plans place, keyed by path.
///
/// Items start after the part's title cost and advance by their planned heights.
/// Block fields stack inside an item; inline fields share the last block's row.
fn expected_slots<'a>(plans: &'a [PagePlan], config: &PageConfiguration) -> HashMap<&'a str, Slot> {
    let metrics = LayoutMetrics::for_config(config);
    let mut slots = HashMap::new();

    for page in plans {
        for part in &page.sections {
            let left = config.column_left(part.column);
            let width = config.column_width(part.column);
            let mut item_top = part.top;

            if part.show_title && part.header_height > 0.0 {
                if let Some(title_path) = &part.title_path {
                    let height = metrics.section_title_row.min(part.header_height);
                    slots.insert(
                        title_path.as_str(),
                        Slot {
                            page_index: page.index,
                            top: part.top + part.header_height - height,
                            left,
                            width,
                            height,
                        },
                    );
                }
                item_top += part.header_height;
            }

            for (item, item_height) in part.items.iter().zip(&part.item_heights) {
                let mut y = item_top;
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
                    slots.insert(
                        field.path.as_str(),
                        Slot {
                            page_index: page.index,
                            top,
                            left: left + width * field.x_ratio,
                            width: width * field.width_ratio,
                            height,
                        },
                    );
                }
                item_top += item_height;
            }
        }
    }
    slots
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
