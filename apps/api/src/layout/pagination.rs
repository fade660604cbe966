//! Pagination Engine: assigns content sections to fixed-size pages.
//!
//! # Algorithm
//! Single forward pass, no backtracking:
//! - Page 0 reserves the personal-info header, later pages the running header, all
//!   pages the footer (see `PageConfiguration`).
//! - A visible section that fits its column's remaining height is appended
//!   (fitting exactly counts as fitting).
//! - Otherwise `byItem` sections go through the splitter; everything else (`none`,
//!   `byGroup`, unrecognized policies) moves whole to the next page, overflowing if it
//!   is taller than a page.
//! - Zero-height and invisible sections are skipped without opening a page.
//! - A second pass fills in every page's total page count.
//!
//! Each page keeps one vertical cursor per column. Pages are only ever appended, so
//! section order across pages always matches input order.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::paper::{Column, LayoutVariant, Margins, PageConfiguration};
use crate::layout::splitter::{per_item_heights, split_by_item, PageFlow};
use crate::models::section::{ContentSection, SectionItem, SectionKind, SplitPolicy};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A section, or a run of its items, placed on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSection {
    pub section_id: String,
    pub kind: SectionKind,
    pub title: String,
    pub title_path: Option<String>,
    pub column: Column,
    /// Whether the renderer draws the section title above this part.
    pub show_title: bool,
    /// True for parts that continue a section started on an earlier page.
    pub is_continuation: bool,
    /// Title cost charged to this part (0 for continuations).
    pub header_height: f32,
    /// Index in the original section of this part's first item.
    pub first_item: usize,
    pub items: Vec<SectionItem>,
    pub item_heights: Vec<f32>,
    /// Absolute y of the part's top edge, in page units.
    pub top: f32,
    pub height: f32,
}

impl PlacedSection {
    /// The whole section as one part, at `top`.
    pub fn whole(section: &ContentSection, column: Column, top: f32) -> Self {
        PlacedSection {
            section_id: section.id.clone(),
            kind: section.kind,
            title: section.title.clone(),
            title_path: section.title_path.clone(),
            column,
            show_title: true,
            is_continuation: false,
            header_height: section.header_height,
            first_item: 0,
            items: section.items.clone(),
            item_heights: per_item_heights(section),
            top,
            height: section.estimated_height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Header/footer descriptor the renderer paints around the page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderFooter {
    pub variant: LayoutVariant,
    /// 1-based page number.
    pub page_number: usize,
    /// Filled in once every page has been planned.
    pub total_pages: usize,
    /// Page 0 carries the full personal-info header; later pages a running header.
    pub personal_header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    pub index: usize,
    pub sections: Vec<PlacedSection>,
    pub header_footer: HeaderFooter,
    pub margins: Margins,
    /// Absolute y where section content starts on this page.
    pub content_top: f32,
    pub main_height: f32,
    pub sidebar_height: f32,
    /// Tallest column's accumulated height, for diagnostics.
    pub content_height: f32,
}

impl PagePlan {
    fn new(index: usize, config: &PageConfiguration) -> Self {
        PagePlan {
            index,
            sections: Vec::new(),
            header_footer: HeaderFooter {
                variant: config.variant,
                page_number: index + 1,
                total_pages: 0,
                personal_header: index == 0,
            },
            margins: config.margins,
            content_top: config.content_top(index),
            main_height: 0.0,
            sidebar_height: 0.0,
            content_height: 0.0,
        }
    }

    /// Items of `section_id` on this page, in order.
    pub fn items_of(&self, section_id: &str) -> impl Iterator<Item = &SectionItem> {
        let section_id = section_id.to_string();
        self.sections
            .iter()
            .filter(move |s| s.section_id == section_id)
            .flat_map(|s| s.items.iter())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page cursor
// ────────────────────────────────────────────────────────────────────────────

/// Mutable page state for one `paginate` call.
struct PageCursor<'a> {
    config: &'a PageConfiguration,
    done: Vec<PagePlan>,
    current: PagePlan,
}

impl<'a> PageCursor<'a> {
    fn new(config: &'a PageConfiguration) -> Self {
        PageCursor {
            config,
            done: Vec::new(),
            current: PagePlan::new(0, config),
        }
    }

    fn used(&self, column: Column) -> f32 {
        match column {
            Column::Main => self.current.main_height,
            Column::Sidebar => self.current.sidebar_height,
        }
    }

    fn page_index(&self) -> usize {
        self.current.index
    }

    fn finish(mut self) -> Vec<PagePlan> {
        if !self.current.sections.is_empty() || self.done.is_empty() {
            self.done.push(self.current);
        }
        let total = self.done.len();
        for page in &mut self.done {
            page.header_footer.total_pages = total;
        }
        self.done
    }
}

impl PageFlow for PageCursor<'_> {
    fn remaining_height(&self, column: Column) -> f32 {
        (self.config.usable_height(self.current.index) - self.used(column)).max(0.0)
    }

    fn page_is_empty(&self) -> bool {
        self.current.sections.is_empty()
    }

    fn place(&mut self, mut part: PlacedSection) {
        part.top = self.current.content_top + self.used(part.column);
        match part.column {
            Column::Main => self.current.main_height += part.height,
            Column::Sidebar => self.current.sidebar_height += part.height,
        }
        self.current.content_height = self.current.main_height.max(self.current.sidebar_height);
        self.current.sections.push(part);
    }

    fn break_page(&mut self) {
        let next = PagePlan::new(self.current.index + 1, self.config);
        let closed = std::mem::replace(&mut self.current, next);
        debug!(
            page = closed.index,
            sections = closed.sections.len(),
            content_height = closed.content_height,
            "Page closed"
        );
        self.done.push(closed);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Splits `sections` into page plans for `config`.
///
/// Always returns at least one page: page 0 carries the personal header even when
/// no section has content. Pure: the same input always yields the same plans.
pub fn paginate(sections: &[ContentSection], config: &PageConfiguration) -> Vec<PagePlan> {
    let mut cursor = PageCursor::new(config);

    for section in sections {
        if section.is_empty_for_layout() {
            debug!(section = %section.id, "Skipping empty or hidden section");
            continue;
        }

        let column = config.effective_column(section.column);
        if section.estimated_height <= cursor.remaining_height(column) {
            let part = PlacedSection::whole(section, column, 0.0);
            cursor.place(part);
            continue;
        }

        match section.split_policy {
            // A splittable section with no items has nothing to split at, so it
            // moves whole like any other policy.
            SplitPolicy::ByItem if !section.items.is_empty() => {
                split_by_item(section, column, &mut cursor);
            }
            _ => {
                if !cursor.page_is_empty() {
                    cursor.break_page();
                }
                if section.estimated_height > config.usable_height(cursor.page_index()) {
                    warn!(
                        section = %section.id,
                        height = section.estimated_height,
                        usable = config.usable_height(cursor.page_index()),
                        "Section is taller than a page; placing it alone and letting it overflow"
                    );
                }
                let part = PlacedSection::whole(section, column, 0.0);
                cursor.place(part);
            }
        }
    }

    cursor.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
