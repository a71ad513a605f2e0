//! Settings file handling
//!
//! Settings live in `<config dir>/plansight/settings.json` unless `--config`
//! points elsewhere. Every field is optional; command-line flags win over
//! whatever the file says.

use anyhow::{Context, Result};
use plansight_explain::PlanLayoutOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Layout parameters used when no flag overrides them
    pub layout: PlanLayoutOptions,
    /// Dialect assumed when `--dialect` is not given
    pub default_dialect: Option<String>,
}

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("plansight"))
}

pub fn settings_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join(SETTINGS_FILE))
}

impl Settings {
    /// Loads from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing default file means defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = settings_file()?;
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "no settings file, using defaults");
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}
