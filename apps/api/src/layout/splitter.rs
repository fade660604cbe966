//! Section Splitter: spreads a `byItem` section across page boundaries.
//!
//! # Rules
//! - Each item costs its own estimated height. Sections built without a per-item
//!   breakdown fall back to `(estimated − header) / item_count`; a section with no
//!   items at all costs `DEFAULT_ITEM_HEIGHT` per item.
//! - The section header is charged once, to the first item placed. Continuation parts
//!   on later pages carry no title and reserve no title space.
//! - An item that does not fit closes the current part, breaks the page and is retried.
//!   An item that does not fit an empty page is placed anyway and overflows.
//!
//! Concatenating the items of every emitted part yields the original item list.

use crate::layout::metrics::DEFAULT_ITEM_HEIGHT;
use crate::layout::paper::Column;
use crate::layout::pagination::PlacedSection;
use crate::models::section::ContentSection;

/// The page state a splitter writes into. Implemented by the pagination engine.
pub trait PageFlow {
    /// Height left in `column` on the current page (never negative).
    fn remaining_height(&self, column: Column) -> f32;
    /// True when nothing at all has been placed on the current page.
    fn page_is_empty(&self) -> bool;
    /// Appends a (partial) section at the column's cursor and advances it.
    fn place(&mut self, part: PlacedSection);
    /// Closes the current page and opens the next one.
    fn break_page(&mut self);
}

/// Uniform per-item height used when a section carries no per-item breakdown.
pub fn uniform_item_height(section: &ContentSection) -> f32 {
    let count = section.items.len();
    if count == 0 {
        return DEFAULT_ITEM_HEIGHT;
    }
    (section.estimated_height - section.header_height).max(0.0) / count as f32
}

/// Per-item heights: the estimator's breakdown when it matches the item list,
/// otherwise the uniform fallback.
pub fn per_item_heights(section: &ContentSection) -> Vec<f32> {
    if !section.items.is_empty() && section.item_heights.len() == section.items.len() {
        section.item_heights.clone()
    } else {
        vec![uniform_item_height(section); section.items.len()]
    }
}

/// Accumulates the items of the part currently being built.
struct PartialSection<'a> {
    section: &'a ContentSection,
    first_item: usize,
    show_title: bool,
    header_height: f32,
    item_heights: Vec<f32>,
    height: f32,
}

impl<'a> PartialSection<'a> {
    fn new(section: &'a ContentSection, first_item: usize) -> Self {
        PartialSection {
            section,
            first_item,
            show_title: false,
            header_height: 0.0,
            item_heights: Vec::new(),
            height: 0.0,
        }
    }

    fn is_empty(&self) -> bool {
        self.item_heights.is_empty()
    }

    fn into_placed(self, column: Column, title_paid_before: bool) -> PlacedSection {
        let end = self.first_item + self.item_heights.len();
        PlacedSection {
            section_id: self.section.id.clone(),
            kind: self.section.kind,
            title: self.section.title.clone(),
            title_path: self.section.title_path.clone(),
            column,
            show_title: self.show_title,
            is_continuation: title_paid_before,
            header_height: self.header_height,
            first_item: self.first_item,
            items: self.section.items[self.first_item..end].to_vec(),
            item_heights: self.item_heights,
            top: 0.0,
            height: self.height,
        }
    }
}

/// Places `section` item by item, breaking pages on `flow` as needed.
pub fn split_by_item<F: PageFlow>(section: &ContentSection, column: Column, flow: &mut F) {
    let heights = per_item_heights(section);
    let mut title_paid = false;
    // Whether the title had been paid when the current part started.
    let mut part_is_continuation = false;
    let mut part = PartialSection::new(section, 0);
    let mut next = 0usize;

    while next < heights.len() {
        let title_cost = if title_paid { 0.0 } else { section.header_height };
        let cost = heights[next] + if part.is_empty() { title_cost } else { 0.0 };
        let available = flow.remaining_height(column) - part.height;

        if cost <= available || (part.is_empty() && flow.page_is_empty()) {
            if part.is_empty() {
                part.first_item = next;
                part_is_continuation = title_paid;
                part.show_title = !title_paid;
                part.header_height = title_cost;
                part.height += title_cost;
            }
            part.item_heights.push(heights[next]);
            part.height += heights[next];
            title_paid = true;
            next += 1;
            continue;
        }

        if !part.is_empty() {
            let full = std::mem::replace(&mut part, PartialSection::new(section, next));
            flow.place(full.into_placed(column, part_is_continuation));
        }
        tracing::debug!(
            section = %section.id,
            item = next,
            "Item does not fit remaining page height, breaking page"
        );
        flow.break_page();
    }

    if !part.is_empty() {
        flow.place(part.into_placed(column, part_is_continuation));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::{SectionItem, SectionKind, SplitPolicy};

    /// Minimal flow with a fixed usable height per page, for exercising the splitter alone.
    struct RecordingFlow {
        usable: f32,
        pages: Vec<Vec<PlacedSection>>,
        used: f32,
    }

    impl RecordingFlow {
        fn new(usable: f32, already_used: f32) -> Self {
            let mut flow = RecordingFlow {
                usable,
                pages: vec![Vec::new()],
                used: already_used,
            };
            if already_used > 0.0 {
                let mut filler = ContentSection::new("filler", SectionKind::Profile, "");
                filler.estimated_height = already_used;
                flow.pages[0].push(PlacedSection::whole(&filler, Column::Main, 0.0));
            }
            flow
        }
    }

    impl PageFlow for RecordingFlow {
        fn remaining_height(&self, _column: Column) -> f32 {
            (self.usable - self.used).max(0.0)
        }
        fn page_is_empty(&self) -> bool {
            self.pages.last().map_or(true, |p| p.is_empty())
        }
        fn place(&mut self, mut part: PlacedSection) {
            part.top = self.used;
            self.used += part.height;
            self.pages.last_mut().unwrap().push(part);
        }
        fn break_page(&mut self) {
            self.pages.push(Vec::new());
            self.used = 0.0;
        }
    }

    fn items(n: usize) -> Vec<SectionItem> {
        (0..n)
            .map(|i| SectionItem {
                path: format!("experiences[{i}]"),
                fields: vec![],
            })
            .collect()
    }

    fn by_item_section(n: usize, total: f32) -> ContentSection {
        let mut section = ContentSection::new("experience", SectionKind::Experience, "Experience");
        section.items = items(n);
        section.estimated_height = total;
        section.split_policy = SplitPolicy::ByItem;
        section
    }

    fn parts(flow: &RecordingFlow) -> Vec<&PlacedSection> {
        flow.pages
            .iter()
            .flatten()
            .filter(|p| p.section_id == "experience")
            .collect()
    }

    // ── per-item heights ────────────────────────────────────────────────────

    #[test]
    fn test_uniform_height_divides_evenly() {
        let section = by_item_section(10, 1000.0);
        assert_eq!(uniform_item_height(&section), 100.0);
    }

    #[test]
    fn test_zero_items_uses_default_height() {
        let section = by_item_section(0, 500.0);
        assert_eq!(uniform_item_height(&section), DEFAULT_ITEM_HEIGHT);
        assert!(per_item_heights(&section).is_empty());
    }

    #[test]
    fn test_breakdown_preferred_over_uniform() {
        let mut section = by_item_section(3, 300.0);
        section.item_heights = vec![50.0, 200.0, 50.0];
        assert_eq!(per_item_heights(&section), vec![50.0, 200.0, 50.0]);

        section.item_heights = vec![50.0];
        assert_eq!(per_item_heights(&section), vec![100.0; 3]);
    }

    // ── split_by_item ───────────────────────────────────────────────────────

    #[test]
    fn test_ten_items_over_two_pages() {
        let section = by_item_section(10, 1000.0);
        let mut flow = RecordingFlow::new(890.0, 0.0);
        split_by_item(&section, Column::Main, &mut flow);

        assert_eq!(flow.pages.len(), 2);
        let emitted = parts(&flow);
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0].items.len(), 8);
        assert_eq!(emitted[1].items.len(), 2);
        assert!(emitted.iter().all(|p| !p.items.is_empty()));
    }

    #[test]
    fn test_items_conserved_in_order() {
        let mut section = by_item_section(7, 0.0);
        section.item_heights = vec![300.0, 120.0, 500.0, 90.0, 410.0, 60.0, 700.0];
        section.estimated_height = section.item_heights.iter().sum();
        let mut flow = RecordingFlow::new(600.0, 250.0);
        split_by_item(&section, Column::Main, &mut flow);

        let paths: Vec<String> = parts(&flow)
            .iter()
            .flat_map(|p| p.items.iter().map(|i| i.path.clone()))
            .collect();
        let expected: Vec<String> = section.items.iter().map(|i| i.path.clone()).collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_title_charged_once() {
        let mut section = by_item_section(4, 0.0);
        section.header_height = 40.0;
        section.item_heights = vec![100.0; 4];
        section.estimated_height = 440.0;
        let mut flow = RecordingFlow::new(250.0, 0.0);
        split_by_item(&section, Column::Main, &mut flow);

        let emitted = parts(&flow);
        // 40 + 100 + 100 = 240 fits; the continuation pages hold two items each.
        assert_eq!(emitted[0].items.len(), 2);
        assert!(emitted[0].show_title);
        assert_eq!(emitted[0].header_height, 40.0);
        assert!(!emitted[0].is_continuation);
        assert_eq!(emitted[1].items.len(), 2);
        assert!(!emitted[1].show_title);
        assert_eq!(emitted[1].header_height, 0.0);
        assert!(emitted[1].is_continuation);
    }

    #[test]
    fn test_title_moves_with_first_item_when_nothing_fits() {
        let mut section = by_item_section(2, 0.0);
        section.header_height = 40.0;
        section.item_heights = vec![100.0, 100.0];
        section.estimated_height = 240.0;
        // Only 120 left: title + first item (140) does not fit.
        let mut flow = RecordingFlow::new(400.0, 280.0);
        split_by_item(&section, Column::Main, &mut flow);

        let emitted = parts(&flow);
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].show_title);
        assert_eq!(emitted[0].first_item, 0);
        assert_eq!(flow.pages.len(), 2);
        assert!(flow.pages[1].iter().any(|p| p.section_id == "experience"));
    }

    #[test]
    fn test_oversized_item_placed_alone() {
        let mut section = by_item_section(3, 0.0);
        section.item_heights = vec![100.0, 2000.0, 100.0];
        section.estimated_height = 2200.0;
        let mut flow = RecordingFlow::new(890.0, 0.0);
        split_by_item(&section, Column::Main, &mut flow);

        let emitted = parts(&flow);
        let counts: Vec<usize> = emitted.iter().map(|p| p.items.len()).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert_eq!(flow.pages.len(), 3);
    }
}
