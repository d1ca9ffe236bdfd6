//! The managed entry point to binary storage.
//!
//! Callers hand a [`BinaryManager`] a stream and get a [`Binary`] back, or look a binary up by
//! digest. Which backend sits behind the manager is a configuration choice; every backend
//! computes digests with its configured algorithm and returns identical handles for identical
//! content, so callers never need to know which one they hold.

use crate::constants::{DATA_DIR_NAME, DEFAULT_SHARD_DEPTH};
use crate::digest::{digest_bytes, Digest, DigestAlgorithm};
use crate::shard::ShardDescriptor;
use crate::store::{AdoptMode, FsBinaryStore, StoreStats};
use crate::{FilesError, FilesResult};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_types::NonEmptyText;

/// Storage backend behind a manager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Sharded directory tree on the local filesystem
    #[default]
    Local,

    /// Process-local map, content is lost when the manager is dropped
    Memory,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBinaryManagerConfig {
    #[serde(default)]
    backend: BackendKind,
    #[serde(default)]
    algorithm: DigestAlgorithm,
    #[serde(default = "default_depth")]
    depth: usize,
    storage_root: PathBuf,
}

fn default_depth() -> usize {
    DEFAULT_SHARD_DEPTH
}

/// Configuration of one binary manager.
///
/// The algorithm, shard depth and storage root are public, read-only properties so that
/// administrative tooling can compute digests and paths that match the manager's own.
/// Deserialisation validates the shard depth against the algorithm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBinaryManagerConfig", into = "RawBinaryManagerConfig")]
pub struct BinaryManagerConfig {
    backend: BackendKind,
    descriptor: ShardDescriptor,
    storage_root: PathBuf,
}

impl BinaryManagerConfig {
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidShardDepth`] if `depth` is too deep for `algorithm`.
    pub fn new(
        backend: BackendKind,
        algorithm: DigestAlgorithm,
        depth: usize,
        storage_root: impl Into<PathBuf>,
    ) -> FilesResult<Self> {
        Ok(Self {
            backend,
            descriptor: ShardDescriptor::new(depth, algorithm)?,
            storage_root: storage_root.into(),
        })
    }

    /// Local filesystem configuration with the default algorithm and depth.
    pub fn local(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::Local,
            descriptor: ShardDescriptor::default(),
            storage_root: storage_root.into(),
        }
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.descriptor.algorithm()
    }

    pub fn depth(&self) -> usize {
        self.descriptor.depth()
    }

    pub fn shard_descriptor(&self) -> ShardDescriptor {
        self.descriptor
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Directory that [`crate::resolve_relative_path`] results are joined onto.
    pub fn data_dir(&self) -> PathBuf {
        self.storage_root.join(DATA_DIR_NAME)
    }

    /// Resolves a relative `storage_root` against `base`.
    pub fn rebased(mut self, base: &Path) -> Self {
        if self.storage_root.is_relative() {
            self.storage_root = base.join(&self.storage_root);
        }
        self
    }
}

impl TryFrom<RawBinaryManagerConfig> for BinaryManagerConfig {
    type Error = FilesError;

    fn try_from(raw: RawBinaryManagerConfig) -> Result<Self, Self::Error> {
        Self::new(raw.backend, raw.algorithm, raw.depth, raw.storage_root)
    }
}

impl From<BinaryManagerConfig> for RawBinaryManagerConfig {
    fn from(config: BinaryManagerConfig) -> Self {
        Self {
            backend: config.backend,
            algorithm: config.descriptor.algorithm(),
            depth: config.descriptor.depth(),
            storage_root: config.storage_root,
        }
    }
}

/// A binary known to a manager: its digest and length.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binary {
    pub digest: Digest,
    pub length: u64,
}

impl Binary {
    /// Wraps this binary as a handle with no document metadata.
    pub fn into_handle(self) -> BinaryHandle {
        BinaryHandle::new(self.digest, self.length)
    }
}

/// Serializable reference to stored content, attachable to a document record.
///
/// A handle does not own the bytes; they are looked up by digest through the manager that
/// stores them. Any caller holding a valid digest and length may build one, including tooling
/// that populated the store out of band.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryHandle {
    pub digest: Digest,

    pub length: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<NonEmptyText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<NonEmptyText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<NonEmptyText>,
}

impl BinaryHandle {
    pub fn new(digest: Digest, length: u64) -> Self {
        Self {
            digest,
            length,
            mime_type: None,
            encoding: None,
            filename: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: NonEmptyText) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    pub fn with_encoding(mut self, encoding: NonEmptyText) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_filename(mut self, filename: NonEmptyText) -> Self {
        self.filename = Some(filename);
        self
    }
}

/// Managed access to a binary store.
pub trait BinaryManager: Send + Sync + fmt::Debug {
    /// Configuration this manager was built from.
    fn config(&self) -> &BinaryManagerConfig;

    /// Stores the content of `reader`, returning its digest and length.
    fn get_binary(&self, reader: &mut dyn Read) -> FilesResult<Binary>;

    /// Looks up content that is already stored, without reading it.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] if the digest is not stored.
    fn get_binary_by_digest(&self, digest: &Digest) -> FilesResult<Binary>;

    /// Opens stored content for reading.
    fn open(&self, digest: &Digest) -> FilesResult<Box<dyn Read + Send>>;

    /// Takes over a file produced outside the manager, stored under `expected`.
    ///
    /// See [`FsBinaryStore::adopt_external_file`] for the meaning of `mode`.
    fn adopt_external_file(
        &self,
        source: &Path,
        expected: &Digest,
        mode: AdoptMode,
    ) -> FilesResult<Binary>;

    /// Count and total size of the binaries held.
    fn stats(&self) -> FilesResult<StoreStats>;

    /// Reads stored content fully into memory.
    fn read(&self, digest: &Digest) -> FilesResult<Vec<u8>> {
        let mut content = Vec::new();
        self.open(digest)?.read_to_end(&mut content)?;
        Ok(content)
    }
}

/// Builds the manager `config` describes.
pub fn build_manager(config: &BinaryManagerConfig) -> FilesResult<Arc<dyn BinaryManager>> {
    Ok(match config.backend() {
        BackendKind::Local => Arc::new(LocalBinaryManager::new(config.clone())?),
        BackendKind::Memory => Arc::new(InMemoryBinaryManager::new(config.clone())),
    })
}

/// Manager over a sharded directory on the local filesystem.
#[derive(Debug)]
pub struct LocalBinaryManager {
    config: BinaryManagerConfig,
    store: FsBinaryStore,
}

impl LocalBinaryManager {
    /// Opens the store at the configured root, creating it if needed.
    pub fn new(config: BinaryManagerConfig) -> FilesResult<Self> {
        let store = FsBinaryStore::open(config.storage_root(), config.shard_descriptor())?;
        Ok(Self { config, store })
    }

    /// The underlying store, for administrative operations such as adoption.
    pub fn store(&self) -> &FsBinaryStore {
        &self.store
    }
}

impl BinaryManager for LocalBinaryManager {
    fn config(&self) -> &BinaryManagerConfig {
        &self.config
    }

    fn get_binary(&self, reader: &mut dyn Read) -> FilesResult<Binary> {
        let stored = self.store.store(reader)?;
        Ok(Binary {
            digest: stored.digest,
            length: stored.length,
        })
    }

    fn get_binary_by_digest(&self, digest: &Digest) -> FilesResult<Binary> {
        let stored = self.store.stored(digest)?;
        Ok(Binary {
            digest: stored.digest,
            length: stored.length,
        })
    }

    fn open(&self, digest: &Digest) -> FilesResult<Box<dyn Read + Send>> {
        Ok(Box::new(self.store.fetch(digest)?))
    }

    fn adopt_external_file(
        &self,
        source: &Path,
        expected: &Digest,
        mode: AdoptMode,
    ) -> FilesResult<Binary> {
        let stored = self.store.adopt_external_file(source, expected, mode)?;
        Ok(Binary {
            digest: stored.digest,
            length: stored.length,
        })
    }

    fn stats(&self) -> FilesResult<StoreStats> {
        self.store.stats()
    }
}

/// Manager keeping content in process memory.
///
/// Honours the same digest and handle contract as [`LocalBinaryManager`]; the configured
/// storage root is informational only.
#[derive(Debug)]
pub struct InMemoryBinaryManager {
    config: BinaryManagerConfig,
    blobs: DashMap<Digest, Arc<[u8]>>,
}

impl InMemoryBinaryManager {
    pub fn new(config: BinaryManagerConfig) -> Self {
        Self {
            config,
            blobs: DashMap::new(),
        }
    }

    /// Number of distinct binaries held.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BinaryManager for InMemoryBinaryManager {
    fn config(&self) -> &BinaryManagerConfig {
        &self.config
    }

    fn get_binary(&self, reader: &mut dyn Read) -> FilesResult<Binary> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        let digest = digest_bytes(&content, self.config.algorithm());
        let length = content.len() as u64;
        self.blobs
            .entry(digest.clone())
            .or_insert_with(|| Arc::from(content));

        tracing::debug!(digest = %digest, length, "stored binary in memory");
        Ok(Binary { digest, length })
    }

    fn get_binary_by_digest(&self, digest: &Digest) -> FilesResult<Binary> {
        self.config.algorithm().validate_digest(digest)?;
        let blob = self
            .blobs
            .get(digest)
            .ok_or_else(|| FilesError::NotFound(digest.clone()))?;
        Ok(Binary {
            digest: digest.clone(),
            length: blob.len() as u64,
        })
    }

    fn open(&self, digest: &Digest) -> FilesResult<Box<dyn Read + Send>> {
        self.config.algorithm().validate_digest(digest)?;
        let blob = self
            .blobs
            .get(digest)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| FilesError::NotFound(digest.clone()))?;
        Ok(Box::new(Cursor::new(blob)))
    }

    fn adopt_external_file(
        &self,
        source: &Path,
        expected: &Digest,
        mode: AdoptMode,
    ) -> FilesResult<Binary> {
        let algorithm = self.config.algorithm();
        algorithm.validate_digest(expected)?;

        if mode == AdoptMode::Trust {
            if let Ok(existing) = self.get_binary_by_digest(expected) {
                return Ok(existing);
            }
        }

        let content = fs::read(source)?;
        if mode == AdoptMode::Verify {
            let actual = digest_bytes(&content, algorithm);
            if &actual != expected {
                return Err(FilesError::DigestMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let length = content.len() as u64;
        self.blobs
            .entry(expected.clone())
            .or_insert_with(|| Arc::from(content));
        Ok(Binary {
            digest: expected.clone(),
            length,
        })
    }

    fn stats(&self) -> FilesResult<StoreStats> {
        Ok(self
            .blobs
            .iter()
            .fold(StoreStats::default(), |mut stats, entry| {
                stats.binary_count += 1;
                stats.total_bytes += entry.value().len() as u64;
                stats
            }))
    }
}
