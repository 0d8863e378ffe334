use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::history::default_history_path;

/// Project configuration loaded from `.scg.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScgConfig {
    /// Overrides the per-user history location.
    pub history_file: Option<String>,
    /// Re-derive JVM parameters whenever the output folder changes while
    /// `Java - Retrofit2` is selected.
    pub rederive_on_output_change: bool,
}

impl Default for ScgConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            rederive_on_output_change: true,
        }
    }
}

impl ScgConfig {
    /// History file to use, or `None` if neither the config nor the platform
    /// provides one.
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(expand_home(path)),
            None => default_history_path(),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".scg.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ScgConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let config: ScgConfig = serde_yaml_ng::from_str(&content)?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# scg configuration
# history_file: ~/.config/scg/history.json   # where the last confirmed settings are kept
rederive_on_output_change: true              # refresh package/gradle paths when the output folder changes (Java - Retrofit2)
"#
}
