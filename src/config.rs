//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$DONORLENS_CONFIG` (environment variable)
//! 2. `~/.config/donorlens/config.toml` (Linux/macOS)
//!    `%APPDATA%\donorlens\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::parser::browser::BrowserWindow;
use crate::parser::location::LocationRange;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Year/month range for location history extraction.
    pub location: LocationRange,
    /// Site list and reference window for browser history extraction.
    pub browser: BrowserWindow,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Output language override ("en", "nl"). Defaults to system locale.
    pub lang: Option<String>,
    /// Anonymize participant names by default.
    pub anonymize: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            lang: None,
            anonymize: false,
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Determine the configuration file path.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("DONORLENS_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("donorlens").join("config.toml"))
}

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}
