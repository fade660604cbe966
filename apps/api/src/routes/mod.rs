pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::layout::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Presets
        .route("/api/v1/layout/variants", get(handlers::handle_list_variants))
        .route(
            "/api/v1/layout/variants/:key",
            get(handlers::handle_get_variant),
        )
        // Pagination
        .route("/api/v1/layout/paginate", post(handlers::handle_paginate))
        .route(
            "/api/v1/layout/sections/paginate",
            post(handlers::handle_paginate_sections),
        )
        // Overlay
        .route("/api/v1/layout/zones", post(handlers::handle_zones))
        .route("/api/v1/layout/field", post(handlers::handle_write_field))
        .route(
            "/api/v1/layout/field/read",
            post(handlers::handle_read_field),
        )
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
