//! Repository name to binary manager resolution.
//!
//! The registry is built once from [`CoreConfig`] (or assembled explicitly with
//! [`BinaryManagerRegistry::builder`]) and is immutable afterwards. Services receive it as an
//! `Arc` rather than looking managers up through process-wide state.

use crate::config::CoreConfig;
use crate::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_files::{build_manager, BinaryManager};
use strata_types::NonEmptyText;

#[derive(Debug)]
pub struct BinaryManagerRegistry {
    managers: BTreeMap<NonEmptyText, Arc<dyn BinaryManager>>,
    default_repository: NonEmptyText,
}

impl BinaryManagerRegistry {
    /// Builds one manager per configured repository.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Files`] if a manager cannot be built, for example because its
    /// storage root is not a usable directory.
    pub fn from_config(config: &CoreConfig) -> CoreResult<Self> {
        let mut builder = Self::builder(config.default_repository().clone());
        for (name, binaries) in config.repositories() {
            let manager = build_manager(binaries)?;
            tracing::info!(
                repository = %name,
                backend = ?binaries.backend(),
                algorithm = %binaries.algorithm(),
                depth = binaries.depth(),
                storage_root = %binaries.storage_root().display(),
                "binary manager ready"
            );
            builder = builder.register(name.clone(), manager);
        }
        builder.build()
    }

    pub fn builder(default_repository: NonEmptyText) -> RegistryBuilder {
        RegistryBuilder {
            managers: BTreeMap::new(),
            default_repository,
        }
    }

    /// Manager backing `repository`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownRepository`] if no manager is registered under that name.
    pub fn resolve(&self, repository: &str) -> CoreResult<Arc<dyn BinaryManager>> {
        self.managers
            .get(repository)
            .cloned()
            .ok_or_else(|| CoreError::UnknownRepository(repository.to_string()))
    }

    pub fn default_repository(&self) -> &NonEmptyText {
        &self.default_repository
    }

    pub fn default_manager(&self) -> CoreResult<Arc<dyn BinaryManager>> {
        self.resolve(self.default_repository.as_str())
    }

    /// Registered repository names, sorted.
    pub fn repository_names(&self) -> impl Iterator<Item = &str> {
        self.managers.keys().map(NonEmptyText::as_str)
    }
}

/// Collects managers before freezing them into a [`BinaryManagerRegistry`].
#[derive(Debug)]
pub struct RegistryBuilder {
    managers: BTreeMap<NonEmptyText, Arc<dyn BinaryManager>>,
    default_repository: NonEmptyText,
}

impl RegistryBuilder {
    /// Registers `manager` under `repository`, replacing any earlier registration.
    pub fn register(mut self, repository: NonEmptyText, manager: Arc<dyn BinaryManager>) -> Self {
        self.managers.insert(repository, manager);
        self
    }

    /// # Errors
    ///
    /// Returns [`CoreError::UnknownRepository`] if the default repository was never registered.
    pub fn build(self) -> CoreResult<BinaryManagerRegistry> {
        if !self.managers.contains_key(&self.default_repository) {
            return Err(CoreError::UnknownRepository(
                self.default_repository.into_string(),
            ));
        }

        Ok(BinaryManagerRegistry {
            managers: self.managers,
            default_repository: self.default_repository,
        })
    }
}
