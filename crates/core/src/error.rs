use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown repository: {0}")]
    UnknownRepository(String),
    #[error("binary storage error: {0}")]
    Files(#[from] strata_files::FilesError),
    #[error("document not found: {0}")]
    DocumentNotFound(String),
    #[error("document {0} has no content")]
    NoContent(String),
    #[error("failed to read configuration (path: {path}): {source}", path = path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create document directory: {0}")]
    DocumentDirCreation(std::io::Error),
    #[error("failed to write document file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read document file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("invalid identifier: {0}")]
    Uuid(#[from] strata_uuid::UuidError),
    #[error("invalid text: {0}")]
    Text(#[from] strata_types::TextError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
