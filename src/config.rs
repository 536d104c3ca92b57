use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const APP_NAME: &str = "dataseed";
const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_DATABASE: &str = "data/mydata.db";

/// Shape of the generated sample data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Ordered category labels; a category's position sets its offset.
    pub categories: Vec<String>,
    /// Points generated per category, with x running 1..=points_per_category.
    pub points_per_category: u32,
    /// Half-open `[min, max)` range of the random part of y.
    pub value_range: (f64, f64),
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            categories: vec!["A".into(), "B".into(), "C".into()],
            points_per_category: 20,
            value_range: (5.0, 15.0),
        }
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.clone()));
            }
        }
        if self.points_per_category == 0 {
            return Err(ConfigError::NoPoints);
        }
        let (min, max) = self.value_range;
        // gen_range panics when the span itself overflows
        if !(min.is_finite() && max.is_finite() && min < max && (max - min).is_finite()) {
            return Err(ConfigError::BadRange(min, max));
        }
        Ok(())
    }

    /// Number of records a full population pass inserts.
    pub fn total_records(&self) -> usize {
        self.categories.len() * self.points_per_category as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database file to create or verify.
    pub database: PathBuf,
    /// Directory holding `<statement>.sql` files; embedded texts when unset.
    pub sql_dir: Option<PathBuf>,
    /// Append log lines to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    pub seed: SeedConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            sql_dir: None,
            log_file: None,
            seed: SeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `path`, or from the default location when
    /// `path` is `None`. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = default_config_path()?;
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&data).with_context(|| format!("failed to parse YAML at {}", path.display()))
    }

    pub fn from_yaml(data: &[u8]) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_slice(data)?;
        Ok(config)
    }
}

/// Return the application config directory path.
pub fn get_app_config_path() -> Result<PathBuf> {
    let mut path = if cfg!(target_os = "macos") {
        dirs_next::home_dir().map(|h| h.join(".config"))
    } else {
        dirs_next::config_dir()
    }
    .ok_or_else(|| anyhow::anyhow!("failed to find os config dir."))?;

    path.push(APP_NAME);
    Ok(path)
}

fn default_config_path() -> Result<PathBuf> {
    Ok(get_app_config_path()?.join(CONFIG_FILE))
}
