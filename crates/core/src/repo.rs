//! Record directory allocation.

use crate::{CoreError, CoreResult};
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use strata_uuid::ShardableUuid;

/// Creates a fresh sharded record directory under `base_dir`.
///
/// Identifiers come from `id_source`. A candidate whose directory already exists is skipped,
/// and allocation gives up after 5 attempts.
///
/// # Errors
///
/// Returns [`CoreError::DocumentDirCreation`] if a directory cannot be created or no free
/// identifier was found.
pub(crate) fn create_unique_record_dir(
    base_dir: &Path,
    mut id_source: impl FnMut() -> ShardableUuid,
) -> CoreResult<(ShardableUuid, PathBuf)> {
    for _attempt in 0..5 {
        let id = id_source();
        let candidate = id.sharded_dir(base_dir);

        if candidate.exists() {
            continue;
        }

        if let Some(parent) = candidate.parent() {
            fs::create_dir_all(parent).map_err(CoreError::DocumentDirCreation)?;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok((id, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(CoreError::DocumentDirCreation(e)),
        }
    }

    Err(CoreError::DocumentDirCreation(io::Error::new(
        ErrorKind::AlreadyExists,
        "failed to allocate a unique document directory after 5 attempts",
    )))
}
