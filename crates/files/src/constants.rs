//! Names of the directories and files that make up a store on disk.

/// Directory under the storage root holding content-addressed binaries.
pub const DATA_DIR_NAME: &str = "data";

/// Directory under the storage root where writes are staged before being moved into place.
pub const STAGING_DIR_NAME: &str = "tmp";

/// Prefix of staged file names.
pub const STAGING_FILE_PREFIX: &str = ".staging-";

/// Shard depth used when configuration does not specify one.
pub const DEFAULT_SHARD_DEPTH: usize = 2;
