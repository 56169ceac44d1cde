//! Engine configuration and loader.
//!
//! Settings live in an optional `palaver.toml`. A missing or broken file is
//! not an error: the engine logs a warning and runs with defaults.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default cap on consecutive pass-through nodes followed in one step.
pub const DEFAULT_MAX_REDIRECTS: usize = 64;

/// Tunables for the conversation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum root/blank nodes followed before the step fails as a loop.
    pub max_redirects: usize,
    /// String that replaces each `|` marker in rendered lines.
    pub line_break: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            line_break: "\n".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects.max(1);
        self
    }

    pub fn with_line_break(mut self, line_break: impl Into<String>) -> Self {
        self.line_break = line_break.into();
        self
    }
}

/// Wrapper for the TOML file; settings sit under an `[engine]` table.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineConfig,
}

/// Loads engine configuration from a TOML file, falling back to defaults on error.
///
/// # Logging
/// - `info!` on successful load
/// - `warn!` if the file cannot be read or parsed (with fallback to defaults)
pub fn load_config(toml_path: &Path) -> EngineConfig {
    match try_load_config(toml_path) {
        Ok(config) => {
            info!(
                "engine config loaded from '{}' (max_redirects = {})",
                toml_path.display(),
                config.max_redirects
            );
            config
        },
        Err(e) => {
            warn!(
                "Could not load engine config from '{}': {:#}. Using defaults.",
                toml_path.display(),
                e
            );
            EngineConfig::default()
        },
    }
}

/// Attempts to load engine configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
fn try_load_config(toml_path: &Path) -> Result<EngineConfig> {
    let text =
        fs::read_to_string(toml_path).with_context(|| format!("reading engine config from '{}'", toml_path.display()))?;

    let wrapper: ConfigFile =
        toml::from_str(&text).with_context(|| format!("parsing engine config from '{}'", toml_path.display()))?;

    let mut config = wrapper.engine;
    config.max_redirects = config.max_redirects.max(1);
    Ok(config)
}
