//! Digest-to-path sharding.
//!
//! A digest `D` stored with depth `d` lives at `D[0..2]/D[2..4]/…/D[2d-2..2d]/D`, relative to the
//! store's data directory. This layout is a persisted contract: backup, migration and injection
//! tooling that knows `{algorithm, depth}` must be able to reproduce it exactly, so the
//! derivation lives in a single pure function, [`resolve_relative_path`].

use crate::constants::DEFAULT_SHARD_DEPTH;
use crate::digest::{Digest, DigestAlgorithm};
use crate::{FilesError, FilesResult};
use std::path::PathBuf;

/// Hex characters consumed by each shard level.
pub const SHARD_WIDTH: usize = 2;

/// Depth and algorithm of a sharded store.
///
/// Invariant: `depth * SHARD_WIDTH <= algorithm.hex_len()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShardDescriptor {
    depth: usize,
    algorithm: DigestAlgorithm,
}

impl ShardDescriptor {
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidShardDepth`] if the digests of `algorithm` are too short to
    /// supply `depth` shard levels.
    pub fn new(depth: usize, algorithm: DigestAlgorithm) -> FilesResult<Self> {
        let digest_len = algorithm.hex_len();
        if depth.saturating_mul(SHARD_WIDTH) > digest_len {
            return Err(FilesError::InvalidShardDepth { depth, digest_len });
        }
        Ok(Self { depth, algorithm })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Relative path of `digest`, after checking it was produced by this descriptor's algorithm.
    pub fn resolve(&self, digest: &Digest) -> FilesResult<PathBuf> {
        self.algorithm.validate_digest(digest)?;
        resolve_relative_path(digest, self.depth)
    }
}

impl Default for ShardDescriptor {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SHARD_DEPTH,
            algorithm: DigestAlgorithm::default(),
        }
    }
}

/// Maps a digest to its path relative to a store's data directory.
///
/// Produces `depth` two-character directory segments taken from the front of the digest,
/// followed by the full digest as the file name. Depth 0 yields the digest alone.
///
/// # Errors
///
/// Returns [`FilesError::InvalidDigest`] if the digest is shorter than `2 * depth` characters.
pub fn resolve_relative_path(digest: &Digest, depth: usize) -> FilesResult<PathBuf> {
    let hex = digest.as_str();
    if hex.len() < depth.saturating_mul(SHARD_WIDTH) {
        return Err(FilesError::InvalidDigest(format!(
            "digest '{}' is too short for shard depth {}",
            hex, depth
        )));
    }

    let mut path = PathBuf::new();
    for level in 0..depth {
        let start = level * SHARD_WIDTH;
        path.push(&hex[start..start + SHARD_WIDTH]);
    }
    path.push(hex);
    Ok(path)
}
