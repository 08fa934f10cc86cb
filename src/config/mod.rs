use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::mapping::TableMapping;
use crate::translator::{QueryTranslator, DEFAULT_REFRESH_DAYS};
use crate::vocabulary::ReferenceSource;

/// Mapping file picked up from the working directory when none is configured
pub const IMPLICIT_MAPPING_FILE: &str = "splunk-mappings.json";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub mappings: MappingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Directory holding splunk-reference.json and kql-reference.json;
    /// built-in data is used when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Days before loaded reference data is reported as stale
    #[serde(default = "default_refresh_interval_days")]
    pub refresh_interval_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// JSON file of table -> {index, sourcetype, note} overrides
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Seed the mapping with the built-in table defaults
    #[serde(default = "default_true")]
    pub use_defaults: bool,
}

// Default value functions
fn default_refresh_interval_days() -> u32 {
    DEFAULT_REFRESH_DAYS
}

fn default_true() -> bool {
    true
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            directory: None,
            refresh_interval_days: DEFAULT_REFRESH_DAYS,
        }
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            file: None,
            use_defaults: true,
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_yaml::to_string(self).context("Failed to serialize config")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path.as_ref(), contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get default configuration path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;

        Ok(home.join(".kqlspl").join("config.yaml"))
    }

    pub fn reference_source(&self) -> ReferenceSource {
        self.reference
            .directory
            .clone()
            .map_or(ReferenceSource::Builtin, ReferenceSource::Directory)
    }

    /// Build the startup table mapping
    ///
    /// A configured override file must load. Without one,
    /// `./splunk-mappings.json` is used if present, and a broken implicit
    /// file only logs a warning.
    pub fn table_mapping(&self) -> Result<TableMapping> {
        self.table_mapping_in(Path::new("."))
    }

    fn table_mapping_in(&self, working_dir: &Path) -> Result<TableMapping> {
        let base = if self.mappings.use_defaults {
            TableMapping::with_defaults()
        } else {
            TableMapping::from_entries(Default::default())
        };

        let overrides = match &self.mappings.file {
            Some(path) => Some(
                TableMapping::load_overrides(path)
                    .with_context(|| format!("Failed to load table mapping {}", path.display()))?,
            ),
            None => {
                let implicit = working_dir.join(IMPLICIT_MAPPING_FILE);
                if implicit.exists() {
                    match TableMapping::load_overrides(&implicit) {
                        Ok(overrides) => Some(overrides),
                        Err(e) => {
                            warn!("Failed to load custom mappings: {}", e);
                            None
                        }
                    }
                } else {
                    None
                }
            }
        };

        Ok(match overrides {
            Some(overrides) => {
                info!(entries = overrides.len(), "Using custom table mappings");
                base.merged(overrides)
            }
            None => {
                info!("Using default table mappings");
                base
            }
        })
    }

    /// Build a translator from this configuration
    pub fn build_translator(&self) -> Result<QueryTranslator> {
        Ok(
            QueryTranslator::new(self.reference_source(), self.table_mapping()?)
                .with_refresh_interval(self.reference.refresh_interval_days),
        )
    }
}
