//! Page Fill Analysis: how well each planned page uses its content area.
//!
//! Diagnostics only: the verdicts never feed back into pagination.
//!
//! # Page fill rules
//! - Overflow: the taller column runs past the usable height (a section or item
//!   taller than a page was placed alone).
//! - Whitespace > 8% on a page that is not the last one → too much whitespace,
//!   usually a whole section that moved on to the next page.
//! - The last page may be as empty as it likes.

use serde::{Deserialize, Serialize};

use crate::layout::pagination::PagePlan;
use crate::layout::paper::PageConfiguration;

/// Whitespace share above which a non-final page is flagged.
pub const WHITESPACE_THRESHOLD: f32 = 0.08;

/// Overflow below this many page units is float noise, not overflow.
const OVERFLOW_EPSILON: f32 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    Acceptable,
    /// More than 8% of a non-final page is empty.
    TooMuchWhitespace,
    /// Content runs past the footer.
    Overflow,
}

/// Fill analysis of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFillAnalysis {
    pub page_index: usize,
    pub usable_height: f32,
    pub main_used: f32,
    pub sidebar_used: f32,
    /// Taller column over usable height.
    pub fill_ratio: f32,
    pub whitespace_fraction: f32,
    pub overflow_fraction: f32,
    pub verdict: PageFillVerdict,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Analyzes every page of a plan.
pub fn analyze_pages(plans: &[PagePlan], config: &PageConfiguration) -> Vec<PageFillAnalysis> {
    let last = plans.len().saturating_sub(1);
    plans
        .iter()
        .map(|page| analyze_page(page, config, page.index == last))
        .collect()
}

/// Analyzes one page; `is_last` relaxes the whitespace rule.
pub fn analyze_page(page: &PagePlan, config: &PageConfiguration, is_last: bool) -> PageFillAnalysis {
    let usable = config.usable_height(page.index);
    let used = page.main_height.max(page.sidebar_height);
    let fill_ratio = if usable > 0.0 { used / usable } else { 0.0 };

    let whitespace_fraction = (1.0_f32 - fill_ratio).max(0.0);
    let overflow_fraction = (fill_ratio - 1.0_f32).max(0.0);

    let verdict = if used - usable > OVERFLOW_EPSILON {
        PageFillVerdict::Overflow
    } else if !is_last && whitespace_fraction > WHITESPACE_THRESHOLD {
        PageFillVerdict::TooMuchWhitespace
    } else {
        PageFillVerdict::Acceptable
    };

    if verdict != PageFillVerdict::Acceptable {
        tracing::debug!(
            page = page.index,
            fill_ratio,
            verdict = ?verdict,
            "Page fill outside the acceptable range"
        );
    }

    PageFillAnalysis {
        page_index: page.index,
        usable_height: usable,
        main_used: page.main_height,
        sidebar_used: page.sidebar_height,
        fill_ratio,
        whitespace_fraction,
        overflow_fraction,
        verdict,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::pagination::paginate;
    use crate::layout::paper::{page_configuration, Column, LayoutVariant, PaperFormat};
    use crate::models::section::{ContentSection, SectionKind};

    fn config() -> &'static PageConfiguration {
        page_configuration(LayoutVariant::Visual, PaperFormat::A4)
    }

    fn section(id: &str, height: f32) -> ContentSection {
        let mut s = ContentSection::new(id, SectionKind::Education, "Education");
        s.estimated_height = height;
        s
    }

    // ── verdicts ────────────────────────────────────────────────────────────

    #[test]
    fn test_single_short_page_is_acceptable() {
        let plans = paginate(&[section("a", 100.0)], config());
        let fill = analyze_pages(&plans, config());
        assert_eq!(fill.len(), 1);
        assert_eq!(fill[0].verdict, PageFillVerdict::Acceptable);
        assert!(fill[0].whitespace_fraction > 0.5);
    }

    #[test]
    fn test_non_final_page_with_gap_is_flagged() {
        let usable = config().usable_height(0);
        let plans = paginate(&[section("a", usable * 0.5), section("b", usable * 0.7)], config());
        assert_eq!(plans.len(), 2);

        let fill = analyze_pages(&plans, config());
        assert_eq!(fill[0].verdict, PageFillVerdict::TooMuchWhitespace);
        assert!((fill[0].fill_ratio - 0.5).abs() < 1e-3);
        assert_eq!(fill[1].verdict, PageFillVerdict::Acceptable);
    }

    #[test]
    fn test_full_page_is_acceptable() {
        let usable = config().usable_height(0);
        let plans = paginate(
            &[section("a", usable * 0.95), section("b", 200.0)],
            config(),
        );
        let fill = analyze_pages(&plans, config());
        assert_eq!(fill[0].verdict, PageFillVerdict::Acceptable);
    }

    #[test]
    fn test_oversized_section_overflows() {
        let tall = config().usable_height(0) * 1.3;
        let plans = paginate(&[section("a", tall)], config());
        let fill = analyze_pages(&plans, config());
        assert_eq!(fill[0].verdict, PageFillVerdict::Overflow);
        assert!((fill[0].overflow_fraction - 0.3).abs() < 1e-3);
        assert_eq!(fill[0].whitespace_fraction, 0.0);
    }

    #[test]
    fn test_taller_column_decides() {
        let usable = config().usable_height(0);
        let main = section("main", usable * 0.3);
        let mut side = section("side", usable * 0.96);
        side.column = Column::Sidebar;
        let plans = paginate(&[main, side], config());

        let fill = analyze_page(&plans[0], config(), false);
        assert!((fill.fill_ratio - 0.96).abs() < 1e-3);
        assert_eq!(fill.verdict, PageFillVerdict::Acceptable);
        assert!(fill.main_used < fill.sidebar_used);
    }

    #[test]
    fn test_empty_plan_yields_one_empty_page() {
        let plans = paginate(&[], config());
        let fill = analyze_pages(&plans, config());
        assert_eq!(fill.len(), 1);
        assert_eq!(fill[0].fill_ratio, 0.0);
        assert_eq!(fill[0].verdict, PageFillVerdict::Acceptable);
    }
}
