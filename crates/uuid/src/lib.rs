//! Document identifiers and sharded-path utilities.
//!
//! Document records are stored under sharded directories derived from their identifier. To keep
//! path derivation deterministic, identifiers use a *canonical* representation: **32 lowercase
//! hexadecimal characters** (no hyphens), the same value `Uuid::new_v4().simple().to_string()`
//! produces.
//!
//! ## Sharded directory layout
//! For a canonical id `u`, records live under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `strata_data/documents/55/0e/550e8400e29b41d4a716446655440000/`

mod service;

pub use service::ShardableUuid;

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
