//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services as an
//! `Arc<CoreConfig>`. Nothing below this module reads environment variables or configuration
//! files while serving requests.
//!
//! ```yaml
//! data_dir: ./strata_data
//! default_repository: default
//! repositories:
//!   default:
//!     backend: local
//!     algorithm: SHA-256
//!     depth: 2
//!     storage_root: ./strata_data/binaries
//! ```

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_REPOSITORY_NAME, DOCUMENTS_DIR_NAME};
use crate::{CoreError, CoreResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strata_files::BinaryManagerConfig;
use strata_types::NonEmptyText;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCoreConfig {
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default = "default_repository_name")]
    default_repository: NonEmptyText,
    repositories: BTreeMap<NonEmptyText, BinaryManagerConfig>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_repository_name() -> NonEmptyText {
    NonEmptyText::new(DEFAULT_REPOSITORY_NAME).expect("default repository name is non-empty")
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    default_repository: NonEmptyText,
    repositories: BTreeMap<NonEmptyText, BinaryManagerConfig>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidInput`] if no repository is configured
    /// - [`CoreError::UnknownRepository`] if `default_repository` is not among `repositories`
    pub fn new(
        data_dir: PathBuf,
        default_repository: NonEmptyText,
        repositories: BTreeMap<NonEmptyText, BinaryManagerConfig>,
    ) -> CoreResult<Self> {
        if repositories.is_empty() {
            return Err(CoreError::InvalidInput(
                "at least one repository must be configured".into(),
            ));
        }

        if !repositories.contains_key(&default_repository) {
            return Err(CoreError::UnknownRepository(
                default_repository.into_string(),
            ));
        }

        Ok(Self {
            data_dir,
            default_repository,
            repositories,
        })
    }

    /// Configuration with a single repository named `default`.
    pub fn single(data_dir: PathBuf, binaries: BinaryManagerConfig) -> Self {
        let name = default_repository_name();
        let mut repositories = BTreeMap::new();
        repositories.insert(name.clone(), binaries);

        Self {
            data_dir,
            default_repository: name,
            repositories,
        }
    }

    /// Parses YAML configuration. Relative paths are kept as written.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let raw: RawCoreConfig =
            serde_yaml::from_str(yaml).map_err(CoreError::YamlDeserialization)?;
        Self::new(raw.data_dir, raw.default_repository, raw.repositories)
    }

    /// Reads YAML configuration from `path`.
    ///
    /// Relative paths in the file are resolved against the directory containing it, so a
    /// configuration behaves the same whatever the working directory.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.rebased(base))
    }

    fn rebased(self, base: &Path) -> Self {
        let data_dir = if self.data_dir.is_relative() {
            base.join(&self.data_dir)
        } else {
            self.data_dir
        };

        let repositories = self
            .repositories
            .into_iter()
            .map(|(name, binaries)| (name, binaries.rebased(base)))
            .collect();

        Self {
            data_dir,
            default_repository: self.default_repository,
            repositories,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir.join(DOCUMENTS_DIR_NAME)
    }

    pub fn default_repository(&self) -> &NonEmptyText {
        &self.default_repository
    }

    pub fn repository(&self, name: &str) -> Option<&BinaryManagerConfig> {
        self.repositories.get(name)
    }

    /// Configured repositories, ordered by name.
    pub fn repositories(&self) -> impl Iterator<Item = (&NonEmptyText, &BinaryManagerConfig)> {
        self.repositories.iter()
    }
}
