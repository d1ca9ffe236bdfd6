//! Constants used throughout the strata core crate.

/// Directory under the data directory holding document records.
pub const DOCUMENTS_DIR_NAME: &str = "documents";

/// Filename of a serialised document record.
pub const DOCUMENT_FILENAME: &str = "document.yaml";

/// Default data directory when configuration does not name one.
pub const DEFAULT_DATA_DIR: &str = "strata_data";

/// Repository used when configuration does not name a default.
pub const DEFAULT_REPOSITORY_NAME: &str = "default";

/// Document type given to records created with [`crate::NewDocument::file`].
pub const FILE_DOCUMENT_TYPE: &str = "File";
