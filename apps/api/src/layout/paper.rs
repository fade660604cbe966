//! Static page presets for every layout variant and paper format.
//!
//! Dimensions are CSS pixels at 96 dpi (A4 = 210mm × 297mm ≈ 794 × 1123 px,
//! US Letter = 8.5" × 11" = 816 × 1056 px). The table is read-only for the lifetime
//! of the process. The pagination engine and the zone calculator both resolve their
//! geometry from the same entry, which is what keeps the overlay aligned with the
//! rendered page.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutError;

// ────────────────────────────────────────────────────────────────────────────
// Variant & paper enums
// ────────────────────────────────────────────────────────────────────────────

/// Document styles the renderer supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// Two columns with a sidebar and a photo slot.
    #[default]
    Visual,
    /// Single column, no photo. Safe for applicant tracking systems.
    Ats,
}

impl LayoutVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            LayoutVariant::Visual => "visual",
            LayoutVariant::Ats => "ats",
        }
    }
}

impl std::str::FromStr for LayoutVariant {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visual" => Ok(LayoutVariant::Visual),
            "ats" => Ok(LayoutVariant::Ats),
            other => Err(LayoutError::UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperFormat {
    #[default]
    A4,
    Letter,
}

impl PaperFormat {
    /// `(width, height)` in CSS pixels.
    pub const fn dimensions(self) -> (f32, f32) {
        match self {
            PaperFormat::A4 => (794.0, 1123.0),
            PaperFormat::Letter => (816.0, 1056.0),
        }
    }
}

/// Logical column a section flows in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    #[default]
    Main,
    Sidebar,
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Geometry of one page preset.
///
/// The first page reserves `first_header_height` below the top margin for the
/// personal-info header; later pages only reserve the slimmer running header.
/// Every page reserves `footer_height` above the bottom margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageConfiguration {
    pub key: &'static str,
    pub variant: LayoutVariant,
    pub paper: PaperFormat,
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    /// Left-hand sidebar column width. `None` means single column.
    pub sidebar_width: Option<f32>,
    pub column_gap: f32,
    /// Typography scale applied to every row height in `LayoutMetrics`.
    pub font_scale: f32,
    pub first_header_height: f32,
    pub running_header_height: f32,
    pub footer_height: f32,
}

impl PageConfiguration {
    /// Width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn content_left(&self) -> f32 {
        self.margins.left
    }

    /// Left edge of a column in absolute page units.
    pub fn column_left(&self, column: Column) -> f32 {
        match (column, self.sidebar_width) {
            (Column::Sidebar, _) => self.margins.left,
            (Column::Main, Some(sidebar)) => self.margins.left + sidebar + self.column_gap,
            (Column::Main, None) => self.margins.left,
        }
    }

    pub fn column_width(&self, column: Column) -> f32 {
        match (column, self.sidebar_width) {
            (Column::Sidebar, Some(sidebar)) => sidebar,
            // Without a sidebar every section flows in the full-width main column.
            (Column::Sidebar, None) => self.content_width(),
            (Column::Main, Some(sidebar)) => self.content_width() - sidebar - self.column_gap,
            (Column::Main, None) => self.content_width(),
        }
    }

    pub fn has_sidebar(&self) -> bool {
        self.sidebar_width.is_some()
    }

    /// Resolves the column a section asks for against this preset.
    pub fn effective_column(&self, requested: Column) -> Column {
        if self.has_sidebar() {
            requested
        } else {
            Column::Main
        }
    }

    /// Absolute y where section content starts on the given page.
    pub fn content_top(&self, page_index: usize) -> f32 {
        let header = if page_index == 0 {
            self.first_header_height
        } else {
            self.running_header_height
        };
        self.margins.top + header
    }

    /// Absolute y where section content must end (footer excluded).
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margins.bottom - self.footer_height
    }

    /// Height available to sections on the given page.
    pub fn usable_height(&self, page_index: usize) -> f32 {
        (self.content_bottom() - self.content_top(page_index)).max(0.0)
    }

    /// Checks the geometric invariants of a preset.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let invalid = |reason: String| LayoutError::InvalidConfiguration {
            key: self.key.to_string(),
            reason,
        };

        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(invalid(format!(
                "page size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let m = &self.margins;
        if [m.top, m.right, m.bottom, m.left].iter().any(|v| *v < 0.0) {
            return Err(invalid("margins must not be negative".to_string()));
        }
        if self.content_width() <= 0.0
            || m.left + self.content_width() + m.right > self.width + f32::EPSILON
        {
            return Err(invalid("horizontal margins leave no content width".to_string()));
        }
        if let Some(sidebar) = self.sidebar_width {
            if sidebar <= 0.0 || sidebar + self.column_gap >= self.content_width() {
                return Err(invalid(format!(
                    "sidebar {sidebar} + gap {} does not fit content width {}",
                    self.column_gap,
                    self.content_width()
                )));
            }
        }
        if self.font_scale <= 0.0 {
            return Err(invalid("font scale must be positive".to_string()));
        }
        if self.usable_height(0) <= 0.0 || self.usable_height(1) <= 0.0 {
            return Err(invalid(
                "vertical reservations leave no usable height".to_string(),
            ));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Preset table
// ────────────────────────────────────────────────────────────────────────────

const VISUAL_MARGINS: Margins = Margins {
    top: 40.0,
    right: 40.0,
    bottom: 40.0,
    left: 40.0,
};

const ATS_MARGINS: Margins = Margins {
    top: 56.0,
    right: 56.0,
    bottom: 48.0,
    left: 56.0,
};

const fn visual(key: &'static str, paper: PaperFormat) -> PageConfiguration {
    let (width, height) = paper.dimensions();
    PageConfiguration {
        key,
        variant: LayoutVariant::Visual,
        paper,
        width,
        height,
        margins: VISUAL_MARGINS,
        sidebar_width: Some(200.0),
        column_gap: 24.0,
        font_scale: 1.0,
        first_header_height: 130.0,
        running_header_height: 32.0,
        footer_height: 28.0,
    }
}

const fn ats(key: &'static str, paper: PaperFormat) -> PageConfiguration {
    let (width, height) = paper.dimensions();
    PageConfiguration {
        key,
        variant: LayoutVariant::Ats,
        paper,
        width,
        height,
        margins: ATS_MARGINS,
        sidebar_width: None,
        column_gap: 0.0,
        font_scale: 0.95,
        first_header_height: 96.0,
        running_header_height: 28.0,
        footer_height: 28.0,
    }
}

static PAGE_CONFIGURATIONS: [PageConfiguration; 4] = [
    visual("visual", PaperFormat::A4),
    ats("ats", PaperFormat::A4),
    visual("visual-letter", PaperFormat::Letter),
    ats("ats-letter", PaperFormat::Letter),
];

/// Every preset, in table order.
pub fn all_configurations() -> &'static [PageConfiguration] {
    &PAGE_CONFIGURATIONS
}

/// Looks a preset up by its key (`"visual"`, `"ats-letter"`, ...).
pub fn lookup(key: &str) -> Option<&'static PageConfiguration> {
    let key = key.trim().to_ascii_lowercase();
    PAGE_CONFIGURATIONS.iter().find(|c| c.key == key)
}

/// Returns the preset for a variant printed on the given paper.
pub fn page_configuration(variant: LayoutVariant, paper: PaperFormat) -> &'static PageConfiguration {
    PAGE_CONFIGURATIONS
        .iter()
        .find(|c| c.variant == variant && c.paper == paper)
        // The table holds one entry per (variant, paper) pair.
        .unwrap_or(&PAGE_CONFIGURATIONS[0])
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        for config in all_configurations() {
            assert!(
                config.validate().is_ok(),
                "preset {} failed validation: {:?}",
                config.key,
                config.validate()
            );
        }
    }

    #[test]
    fn test_every_variant_paper_pair_present() {
        for variant in [LayoutVariant::Visual, LayoutVariant::Ats] {
            for paper in [PaperFormat::A4, PaperFormat::Letter] {
                let config = page_configuration(variant, paper);
                assert_eq!(config.variant, variant);
                assert_eq!(config.paper, paper);
            }
        }
    }

    #[test]
    fn test_lookup_by_key() {
        assert_eq!(lookup("ats-letter").map(|c| c.paper), Some(PaperFormat::Letter));
        assert_eq!(lookup(" Visual ").map(|c| c.variant), Some(LayoutVariant::Visual));
        assert!(lookup("poster").is_none());
    }

    #[test]
    fn test_columns_partition_content_width() {
        let config = page_configuration(LayoutVariant::Visual, PaperFormat::A4);
        let sidebar = config.column_width(Column::Sidebar);
        let main = config.column_width(Column::Main);
        assert!((sidebar + config.column_gap + main - config.content_width()).abs() < 1e-3);
        assert!(
            (config.column_left(Column::Main) - (config.margins.left + sidebar + config.column_gap))
                .abs()
                < 1e-3
        );
    }

    #[test]
    fn test_single_column_ignores_sidebar_request() {
        let config = page_configuration(LayoutVariant::Ats, PaperFormat::A4);
        assert_eq!(config.effective_column(Column::Sidebar), Column::Main);
        assert_eq!(config.column_width(Column::Main), config.content_width());
    }

    #[test]
    fn test_first_page_reserves_more_than_later_pages() {
        for config in all_configurations() {
            assert!(config.usable_height(0) < config.usable_height(1));
            assert_eq!(config.usable_height(1), config.usable_height(7));
        }
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("ATS".parse::<LayoutVariant>(), Ok(LayoutVariant::Ats));
        assert_eq!(LayoutVariant::Visual.as_str().parse::<LayoutVariant>(), Ok(LayoutVariant::Visual));
        assert_eq!(
            "poster".parse::<LayoutVariant>(),
            Err(LayoutError::UnknownVariant("poster".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_zero_height() {
        let mut config = page_configuration(LayoutVariant::Ats, PaperFormat::A4).clone();
        config.height = 0.0;
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_margins_wider_than_page() {
        let mut config = page_configuration(LayoutVariant::Ats, PaperFormat::A4).clone();
        config.margins.left = 500.0;
        config.margins.right = 400.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_sidebar() {
        let mut config = page_configuration(LayoutVariant::Visual, PaperFormat::A4).clone();
        config.sidebar_width = Some(config.content_width());
        assert!(config.validate().is_err());
    }
}
