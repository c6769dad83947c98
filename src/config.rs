use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dice::DEFAULT_SIDES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Free text shown at the top of the help page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default = "default_sides")]
    pub sides: u32,
    /// End the session after this many seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_prompt() -> String {
    "< ".to_string()
}

fn default_sides() -> u32 {
    DEFAULT_SIDES
}

fn default_color() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            banner: None,
            sides: default_sides(),
            timeout_secs: None,
            color: default_color(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid JSON in config: {0}")]
    InvalidJson(String),
    #[error("IO error reading config: {0}")]
    IoError(#[from] std::io::Error),
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("diceshell.json"))
}

pub fn load_config() -> Result<ShellConfig, ConfigError> {
    let path = config_path().ok_or_else(|| {
        ConfigError::NotFound(PathBuf::from("~/.config/diceshell.json"))
    })?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ShellConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::InvalidJson(e.to_string()))
}

impl ShellConfig {
    /// Write to the default config path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_path().ok_or_else(|| {
            ConfigError::NotFound(PathBuf::from("~/.config/diceshell.json"))
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidJson(e.to_string()))?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
