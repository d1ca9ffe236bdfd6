//! # Strata Core
//!
//! Repository configuration, binary manager resolution and document records.
//!
//! This crate sits on top of `strata-files`:
//! - [`CoreConfig`] describes each named repository and its binary manager
//! - [`BinaryManagerRegistry`] builds and resolves those managers
//! - [`DocumentService`] creates document records whose content references a stored binary
//!
//! Binary storage itself (digests, sharded paths, the filesystem store) lives in
//! `strata-files`; this crate never touches blob files directly.

pub mod config;
pub mod constants;
pub mod documents;
pub mod error;
pub mod registry;
mod repo;

pub use config::CoreConfig;
pub use documents::{Document, DocumentService, NewDocument};
pub use error::{CoreError, CoreResult};
pub use registry::{BinaryManagerRegistry, RegistryBuilder};

pub use strata_files::{
    compute_digest, resolve_relative_path, AdoptMode, Binary, BinaryHandle, BinaryManager,
    BinaryManagerConfig, Digest, DigestAlgorithm, FilesError,
};
pub use strata_types::NonEmptyText;
pub use strata_uuid::ShardableUuid;
