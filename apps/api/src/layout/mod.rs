// Layout core: height estimation, pagination, section splitting, overlay zones.
// Everything here is pure and synchronous; handlers run it inside
// tokio::task::spawn_blocking.

pub mod consistency;
pub mod estimator;
pub mod handlers;
pub mod metrics;
pub mod page_fill;
pub mod pagination;
pub mod paper;
pub mod sections;
pub mod splitter;
pub mod zones;

use thiserror::Error;

use crate::models::profile::Profile;

pub use pagination::{paginate, PagePlan};
pub use paper::{page_configuration, LayoutVariant, PageConfiguration, PaperFormat};
pub use sections::{build_sections, DesignConfig, Language};
pub use zones::{calculate_zones, FieldZone};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Page configuration '{key}' is invalid: {reason}")]
    InvalidConfiguration { key: String, reason: String },

    #[error("Unknown layout variant '{0}'")]
    UnknownVariant(String),

    #[error("{drifts} overlay zone(s) disagree with the page plan")]
    Inconsistent { drifts: usize },
}

/// Maps, estimates and paginates a profile with one page configuration.
///
/// The renderer path and the zone calculator both go through here, so they
/// always see the same plans.
pub fn plan_profile(
    profile: &Profile,
    design: &DesignConfig,
    config: &PageConfiguration,
    language: Language,
) -> Vec<PagePlan> {
    let sections = build_sections(profile, design, config, language);
    paginate(&sections, config)
}
