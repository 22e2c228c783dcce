//! Application configuration.
//!
//! The configuration is loaded from
//! `$XDG_CONFIG_HOME/hyprtile/config.json`.  The top-level schema is
//! sectioned so the file can be extended later without breaking backward
//! compatibility.
//!
//! # Example
//!
//! ```json
//! {
//!   "tiling": { "retry_delay_ms": 300 },
//!   "notify": { "timeout_ms": 10000 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional: a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tiling sequence settings.
    #[serde(default)]
    pub tiling: TilingConfig,

    /// On-screen warning settings.
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Tiling sequence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Pause between the first layout application and the retry pass (ms).
    /// The retry compensates for the compositor occasionally ignoring a
    /// single application of geometry.
    pub retry_delay_ms: u64,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self { retry_delay_ms: 300 }
    }
}

/// On-screen warning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// How long the multi-monitor exclusion warning stays visible (ms).
    pub timeout_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
