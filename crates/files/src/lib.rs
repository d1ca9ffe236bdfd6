//! Strata Binary Storage
//!
//! Content-addressed storage for the binaries attached to strata documents.
//!
//! ## Design Principles
//!
//! - A binary is identified by the digest of its content, never by an assigned name
//! - Identical content is stored once, however many documents reference it
//! - Stored binaries are immutable; a digest either resolves to complete content or to nothing
//! - Documents hold a [`BinaryHandle`] (digest, length and optional metadata), not the bytes
//! - The digest-to-path mapping is a public, pure function, so tooling outside the store can
//!   place files exactly where the store would
//!
//! ## Storage Layout
//!
//! ```text
//! <storage_root>/
//! ├── data/
//! │   └── ab/              # shard levels, two hex characters each
//! │       └── cd/
//! │           └── abcd…    # full digest as filename
//! └── tmp/                 # staged writes
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use strata_files::{BinaryManager, BinaryManagerConfig, LocalBinaryManager};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = LocalBinaryManager::new(BinaryManagerConfig::local("strata_data/binaries"))?;
//!
//! let binary = manager.get_binary(&mut &b"Hello, World!"[..])?;
//! let content = manager.read(&binary.digest)?;
//! assert_eq!(content, b"Hello, World!");
//! # Ok(())
//! # }
//! ```

mod constants;
mod digest;
mod manager;
mod shard;
mod store;

pub use constants::{DATA_DIR_NAME, DEFAULT_SHARD_DEPTH, STAGING_DIR_NAME};
pub use digest::{
    buffer_size_for, compute_digest, compute_digest_with_hint, digest_bytes, digest_file, Digest,
    DigestAlgorithm, DigestHasher, MAX_BUF_SIZE, MIN_BUF_SIZE,
};
pub use manager::{
    build_manager, BackendKind, Binary, BinaryHandle, BinaryManager, BinaryManagerConfig,
    InMemoryBinaryManager, LocalBinaryManager,
};
pub use shard::{resolve_relative_path, ShardDescriptor, SHARD_WIDTH};
pub use store::{AdoptMode, FsBinaryStore, StoreStats, StoredBinary};

/// Errors that can occur during binary storage operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// The configured digest algorithm is not available
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A digest string is malformed or does not fit the store's algorithm
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// Shard depth needs more hex characters than the algorithm's digests have
    #[error("Shard depth {depth} is too deep for {digest_len}-character digests")]
    InvalidShardDepth { depth: usize, digest_len: usize },

    /// No binary is stored under the digest
    #[error("Binary not found: {0}")]
    NotFound(Digest),

    /// Content handed over for adoption does not hash to the claimed digest
    #[error("Digest mismatch: expected {expected}, computed {actual}")]
    DigestMismatch { expected: Digest, actual: Digest },

    /// Storage root exists but cannot be used
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for binary storage operations.
pub type FilesResult<T> = Result<T, FilesError>;
