//! Axum route handlers for the Layout API.
//!
//! Layout work is CPU-bound and synchronous, so each handler moves owned request
//! data into `tokio::task::spawn_blocking` and awaits the result.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::layout::consistency::{verify_zones, ConsistencyReport};
use crate::layout::page_fill::{analyze_pages, PageFillAnalysis};
use crate::layout::paper::{self, all_configurations, PageConfiguration};
use crate::layout::zones::zones_for_pages;
use crate::layout::{
    page_configuration, paginate, plan_profile, DesignConfig, FieldZone, Language, LayoutError,
    PagePlan, PaperFormat,
};
use crate::models::path;
use crate::models::profile::Profile;
use crate::models::section::ContentSection;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Profile snapshot plus the design choices that shape its layout.
#[derive(Debug, Deserialize)]
pub struct ProfileLayoutRequest {
    /// Raw editor JSON. Anything that does not read as a profile lays out as nothing.
    #[serde(default)]
    pub profile: Value,
    /// Omitted design → defaults with the server's `DEFAULT_VARIANT`.
    #[serde(default)]
    pub design: Option<DesignConfig>,
    #[serde(default)]
    pub paper: PaperFormat,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct PaginateResponse {
    pub configuration: &'static str,
    pub pages: Vec<PagePlan>,
    pub fill: Vec<PageFillAnalysis>,
}

#[derive(Debug, Deserialize)]
pub struct SectionsPaginateRequest {
    /// Preset key (`visual`, `ats-letter`, ...). Omitted → the server default on A4.
    #[serde(default)]
    pub variant: Option<String>,
    pub sections: Vec<ContentSection>,
}

#[derive(Debug, Serialize)]
pub struct SectionsPaginateResponse {
    pub configuration: &'static str,
    pub pages: Vec<PagePlan>,
}

#[derive(Debug, Serialize)]
pub struct ZonesResponse {
    pub configuration: &'static str,
    pub zones: Vec<FieldZone>,
    pub consistency: ConsistencyReport,
}

#[derive(Debug, Deserialize)]
pub struct FieldWriteRequest {
    pub profile: Value,
    pub path: String,
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct FieldWriteResponse {
    pub profile: Value,
}

#[derive(Debug, Deserialize)]
pub struct FieldReadRequest {
    pub profile: Value,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct FieldReadResponse {
    pub path: String,
    pub value: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/layout/variants
///
/// Returns every page preset.
pub async fn handle_list_variants() -> Json<&'static [PageConfiguration]> {
    Json(all_configurations())
}

/// GET /api/v1/layout/variants/:key
pub async fn handle_get_variant(
    Path(key): Path<String>,
) -> Result<Json<&'static PageConfiguration>, AppError> {
    let config = paper::lookup(&key).ok_or(LayoutError::UnknownVariant(key))?;
    Ok(Json(config))
}

/// POST /api/v1/layout/paginate
///
/// Maps the profile to sections, paginates them and reports per-page fill.
pub async fn handle_paginate(
    State(state): State<AppState>,
    Json(request): Json<ProfileLayoutRequest>,
) -> Result<Json<PaginateResponse>, AppError> {
    let (design, paper, language) = resolve_design(&state, &request);
    let profile = Profile::from_value(&request.profile);
    let config = page_configuration(design.variant, paper);

    let (pages, fill) = run_blocking("pagination", move || {
        let pages = match &profile {
            Some(profile) => plan_profile(profile, &design, config, language),
            None => paginate(&[], config),
        };
        let fill = analyze_pages(&pages, config);
        (pages, fill)
    })
    .await?;

    tracing::info!(
        configuration = config.key,
        pages = pages.len(),
        "Profile paginated"
    );

    Ok(Json(PaginateResponse {
        configuration: config.key,
        pages,
        fill,
    }))
}

/// POST /api/v1/layout/sections/paginate
///
/// Raw engine contract: paginates caller-built sections as given.
pub async fn handle_paginate_sections(
    State(state): State<AppState>,
    Json(request): Json<SectionsPaginateRequest>,
) -> Result<Json<SectionsPaginateResponse>, AppError> {
    let config = match request.variant.as_deref() {
        Some(key) => {
            paper::lookup(key).ok_or_else(|| LayoutError::UnknownVariant(key.to_string()))?
        }
        None => page_configuration(state.config.default_variant, PaperFormat::A4),
    };
    let sections = request.sections;

    let pages = run_blocking("pagination", move || paginate(&sections, config)).await?;

    Ok(Json(SectionsPaginateResponse {
        configuration: config.key,
        pages,
    }))
}

/// POST /api/v1/layout/zones
///
/// Computes overlay zones for every page and cross-checks them against the plan.
/// With `STRICT_ZONE_CONSISTENCY` set, any drift beyond tolerance is a 422.
pub async fn handle_zones(
    State(state): State<AppState>,
    Json(request): Json<ProfileLayoutRequest>,
) -> Result<Json<ZonesResponse>, AppError> {
    let (design, paper, language) = resolve_design(&state, &request);
    let profile = Profile::from_value(&request.profile);
    let config = page_configuration(design.variant, paper);
    let tolerance = state.config.zone_tolerance_px;

    let (zones, consistency) = run_blocking("zone calculation", move || {
        let pages = match &profile {
            Some(profile) => plan_profile(profile, &design, config, language),
            None => paginate(&[], config),
        };
        let zones = match &profile {
            Some(profile) => zones_for_pages(profile, &design, &pages, config),
            None => Vec::new(),
        };
        let consistency = verify_zones(&pages, &zones, config, tolerance);
        (zones, consistency)
    })
    .await?;

    if state.config.strict_zone_consistency && !consistency.passed {
        return Err(LayoutError::Inconsistent {
            drifts: consistency.drifts.len(),
        }
        .into());
    }

    Ok(Json(ZonesResponse {
        configuration: config.key,
        zones,
        consistency,
    }))
}

/// POST /api/v1/layout/field
///
/// Writes an overlay edit back into the profile at the zone's path.
pub async fn handle_write_field(
    Json(request): Json<FieldWriteRequest>,
) -> Result<Json<FieldWriteResponse>, AppError> {
    let FieldWriteRequest {
        mut profile,
        path,
        value,
    } = request;
    if !profile.is_object() {
        return Err(AppError::Validation("profile must be a JSON object".to_string()));
    }

    let was_valid = Profile::from_value(&profile).is_some();
    path::set(&mut profile, &path, value)?;
    // A write must not turn a readable profile into one the layout rejects.
    if was_valid && Profile::from_value(&profile).is_none() {
        return Err(AppError::Validation(format!(
            "value at '{path}' does not fit the profile schema"
        )));
    }
    tracing::debug!(path = %path, "Field written");

    Ok(Json(FieldWriteResponse { profile }))
}

/// POST /api/v1/layout/field/read
pub async fn handle_read_field(
    Json(request): Json<FieldReadRequest>,
) -> Result<Json<FieldReadResponse>, AppError> {
    path::parse_path(&request.path)?;
    let value = path::get(&request.profile, &request.path)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No value at '{}'", request.path)))?;

    Ok(Json(FieldReadResponse {
        path: request.path,
        value,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn resolve_design(
    state: &AppState,
    request: &ProfileLayoutRequest,
) -> (DesignConfig, PaperFormat, Language) {
    let design = request.design.clone().unwrap_or_else(|| DesignConfig {
        variant: state.config.default_variant,
        ..Default::default()
    });
    (design, request.paper, request.language)
}

/// Runs CPU-bound layout work off the async executor.
async fn run_blocking<T, F>(what: &'static str, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {what}: {e}")))
}
