//! Global defaults.
//!
//! All process-wide configuration lives in one immutable [`Defaults`]
//! value threaded through the context builder. The environment is read
//! once, at construction, never through hidden mutable statics.

use modlet_model::Severity;
use std::path::PathBuf;

/// Environment variable naming the provider-list location.
pub const PROVIDER_LOCATION_ENV: &str = "MODLET_PROVIDER_LOCATION";
/// Environment variable naming the modlet document location.
pub const DOCUMENT_LOCATION_ENV: &str = "MODLET_DOCUMENT_LOCATION";
/// Environment variable naming the transformation program location.
pub const TRANSFORM_LOCATION_ENV: &str = "MODLET_TRANSFORM_LOCATION";
/// Environment variable naming the platform override file.
pub const PLATFORM_OVERRIDES_ENV: &str = "MODLET_PLATFORM_OVERRIDES";
/// Environment variable naming the log-level gate.
pub const LOG_LEVEL_ENV: &str = "MODLET_LOG_LEVEL";

/// Immutable global defaults for a context.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    /// Search-path location of provider-list resources.
    pub provider_location: String,
    /// Search-path location of modlet documents.
    pub document_location: String,
    /// Search-path location of transformation programs.
    pub transform_location: String,
    /// The platform override file, if any.
    pub platform_overrides: Option<PathBuf>,
    /// Whether pipeline stages run unless configured otherwise.
    pub enabled: bool,
    /// Whether documents are schema-validated as they are parsed.
    pub validating: bool,
    /// Severity gate below which context log events are dropped.
    pub log_level: Severity,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            provider_location: "modlet/providers".to_string(),
            document_location: "modlet".to_string(),
            transform_location: "modlet/transforms".to_string(),
            platform_overrides: dirs::config_dir()
                .map(|dir| dir.join("modlet").join("overrides.properties")),
            enabled: true,
            validating: true,
            log_level: Severity::Info,
        }
    }
}

impl Defaults {
    /// Defaults with every environment override applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut defaults = Self::default();
        if let Some(value) = lookup(PROVIDER_LOCATION_ENV) {
            defaults.provider_location = value;
        }
        if let Some(value) = lookup(DOCUMENT_LOCATION_ENV) {
            defaults.document_location = value;
        }
        if let Some(value) = lookup(TRANSFORM_LOCATION_ENV) {
            defaults.transform_location = value;
        }
        if let Some(value) = lookup(PLATFORM_OVERRIDES_ENV) {
            defaults.platform_overrides = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup(LOG_LEVEL_ENV) {
            match value.parse::<Severity>() {
                Ok(level) => defaults.log_level = level,
                Err(message) => {
                    tracing::warn!(%message, "ignoring invalid {LOG_LEVEL_ENV}");
                }
            }
        }
        defaults
    }
}
