use anyhow::{Context, Result};

use crate::layout::LayoutVariant;

/// Application configuration loaded from environment variables.
/// Every variable has a default; a value that is set but unparsable fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Variant used when a request's design omits one.
    pub default_variant: LayoutVariant,
    /// Allowed zone/plan disagreement, in page units.
    pub zone_tolerance_px: f32,
    /// Reject zone responses whose consistency check fails (422) instead of only logging.
    pub strict_zone_consistency: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            default_variant: LayoutVariant::Visual,
            zone_tolerance_px: 2.0,
            strict_zone_consistency: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: optional_env("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(defaults.port),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            default_variant: optional_env("DEFAULT_VARIANT")
                .map(|v| v.parse::<LayoutVariant>())
                .transpose()
                .context("DEFAULT_VARIANT must be 'visual' or 'ats'")?
                .unwrap_or(defaults.default_variant),
            zone_tolerance_px: optional_env("ZONE_TOLERANCE_PX")
                .map(|v| parse_tolerance(&v))
                .transpose()?
                .unwrap_or(defaults.zone_tolerance_px),
            strict_zone_consistency: optional_env("STRICT_ZONE_CONSISTENCY")
                .map(|v| parse_flag(&v))
                .transpose()
                .context("STRICT_ZONE_CONSISTENCY must be true or false")?
                .unwrap_or(defaults.strict_zone_consistency),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_tolerance(value: &str) -> Result<f32> {
    let tolerance = value
        .trim()
        .parse::<f32>()
        .context("ZONE_TOLERANCE_PX must be a number")?;
    anyhow::ensure!(
        tolerance.is_finite() && tolerance >= 0.0,
        "ZONE_TOLERANCE_PX must be a non-negative number, got {tolerance}"
    );
    Ok(tolerance)
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("not a boolean: '{other}'"),
    }
}
