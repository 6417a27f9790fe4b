use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BROKEN_TEXT_MARKER: &str = "COVID-19 RESOURCES";
pub const DEFAULT_OUTPUT_FILE: &str = "combined.txt";
pub const DEFAULT_FIX_FILE: &str = "fix.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level curation settings. Every section and field is optional in TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    pub quarantine: QuarantineConfig,
    pub export: ExportConfig,
}

impl CurationConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

/// Settings for the broken-story detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarantineConfig {
    /// A story whose trimmed text ends with this marker is quarantined.
    pub trailing_marker: String,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        Self {
            trailing_marker: DEFAULT_BROKEN_TEXT_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name used when the caller gives no output path.
    pub default_output_file: String,
    /// File name used when loading a story fix without an explicit path.
    pub default_fix_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_output_file: DEFAULT_OUTPUT_FILE.to_string(),
            default_fix_file: DEFAULT_FIX_FILE.to_string(),
        }
    }
}
