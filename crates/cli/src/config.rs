//! Configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::formats::OutputFormat;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    /// How the recovered secret is printed
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Check unused shares against the reconstructed polynomial
    #[serde(default)]
    pub verify: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    fn load_default() -> Result<Self> {
        let config_paths = [
            dirs::config_dir().map(|d| d.join("fractus").join("config.toml")),
            Some(PathBuf::from("fractus.toml")),
            Some(PathBuf::from(".fractus.toml")),
        ];

        for config_path in config_paths.into_iter().flatten() {
            if config_path.exists() {
                log::debug!("Loading configuration from {}", config_path.display());
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
