//! Runtime configuration
//!
//! Loaded from YAML; every field is optional and falls back to its
//! default. The ISiS executable path can also be set through the
//! `ISIS_EXECUTABLE_PATH` environment variable, which wins over the file.
//!
//! ```yaml
//! isis_executable_path: /opt/isis/isis.sh
//! flags: ["--quiet"]
//! remove_score_file: true
//! score:
//!   tempo: 90
//!   n_events_per_line: 8
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::converters::isis::constants::{DEFAULT_ISIS_EXECUTABLE_PATH, ISIS_EXECUTABLE_PATH_ENV};
use crate::converters::isis::errors::{IsisError, Result};
use crate::converters::isis::ScoreSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsisConfig {
    /// ISiS executable (or the `isis.sh` wrapper script)
    pub isis_executable_path: PathBuf,

    /// Flags passed to every ISiS call
    pub flags: Vec<String>,

    pub remove_score_file: bool,

    pub score: ScoreSettings,
}

impl Default for IsisConfig {
    fn default() -> Self {
        Self {
            isis_executable_path: PathBuf::from(DEFAULT_ISIS_EXECUTABLE_PATH),
            flags: Vec::new(),
            remove_score_file: false,
            score: ScoreSettings::default(),
        }
    }
}

impl IsisConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<IsisConfig> {
        let config: IsisConfig =
            serde_yaml::from_str(yaml).map_err(|e| IsisError::Config(e.to_string()))?;
        config.score.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<IsisConfig> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| IsisError::io(path, e))?;
        let config = IsisConfig::from_yaml_str(&yaml).map_err(|e| match e {
            IsisError::Config(message) => {
                IsisError::Config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `ISIS_EXECUTABLE_PATH` if set and non-empty
    pub fn with_env_overrides(self) -> Self {
        self.with_executable_override(std::env::var_os(ISIS_EXECUTABLE_PATH_ENV))
    }

    fn with_executable_override(mut self, value: Option<std::ffi::OsString>) -> Self {
        if let Some(path) = value.filter(|path| !path.is_empty()) {
            log::debug!("{} overrides ISiS executable path", ISIS_EXECUTABLE_PATH_ENV);
            self.isis_executable_path = PathBuf::from(path);
        }
        self
    }

    /// Config file if given, defaults otherwise, then environment overrides
    pub fn resolve(path: Option<&Path>) -> Result<IsisConfig> {
        let config = match path {
            Some(path) => IsisConfig::load(path)?,
            None => IsisConfig::default(),
        };
        Ok(config.with_env_overrides())
    }
}
