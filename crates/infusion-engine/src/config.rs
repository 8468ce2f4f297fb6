//! Pack validator configuration.
//!
//! Configuration can be loaded from and saved to a TOML file. Missing
//! fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use infusion_common::{InfusionError, InfusionResult};
use infusion_crafting::MatchPolicy;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::recipe_loader::DEFAULT_RECIPE_PATH;
use crate::registry_loader::DEFAULT_REGISTRY_PATH;

/// Configuration file name.
pub const CONFIG_FILE: &str = "infusion.toml";

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "infusion=info";

/// Validator configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfusionConfig {
    /// Directory holding recipe pack files
    pub recipe_path: PathBuf,
    /// Item registry file
    pub registry_path: PathBuf,
    /// Policy for recipes that do not name one
    pub default_policy: MatchPolicy,
    /// Tracing filter directive
    pub log_filter: String,
    /// Treat rejected recipes and files as a failure
    pub strict: bool,
}

impl Default for InfusionConfig {
    fn default() -> Self {
        Self {
            recipe_path: PathBuf::from(DEFAULT_RECIPE_PATH),
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            default_policy: MatchPolicy::Greedy,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            strict: false,
        }
    }
}

impl InfusionConfig {
    /// Load configuration from a file, or return defaults if it is missing
    /// or unreadable.
    #[must_use]
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                info!("Loaded config from {}", path.display());
                config.validate();
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> InfusionResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| InfusionError::Serialization(e.to_string()))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Replace unusable values with defaults.
    pub fn validate(&mut self) {
        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
        if self.recipe_path.as_os_str().is_empty() {
            self.recipe_path = PathBuf::from(DEFAULT_RECIPE_PATH);
        }
        if self.registry_path.as_os_str().is_empty() {
            self.registry_path = PathBuf::from(DEFAULT_REGISTRY_PATH);
        }
    }

    /// Resolve relative paths against the directory of the config file.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.recipe_path.is_relative() {
            self.recipe_path = base.join(&self.recipe_path);
        }
        if self.registry_path.is_relative() {
            self.registry_path = base.join(&self.registry_path);
        }
        self
    }
}
