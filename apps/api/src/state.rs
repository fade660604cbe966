use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Page presets are a process-wide static table, so the state only carries the
/// runtime settings that pick among them.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState { config }
    }
}
