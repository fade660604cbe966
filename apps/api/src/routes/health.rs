use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::layout::paper::all_configurations;
use crate::state::AppState;

/// GET /health
/// Service version plus the layout defaults this instance answers with.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cv-layout",
        "presets": all_configurations().len(),
        "default_variant": state.config.default_variant.as_str(),
        "strict_zone_consistency": state.config.strict_zone_consistency
    }))
}
