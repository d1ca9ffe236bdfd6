//! Document records with attached binaries.
//!
//! A document record carries an optional [`BinaryHandle`] as its content property. The bytes
//! stay in the binary store of the record's repository; the record only references them by
//! digest, so uploading content and creating the record are independent steps.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/documents/
//!   <s1>/
//!     <s2>/
//!       <uuid>/
//!         document.yaml
//! ```

use crate::config::CoreConfig;
use crate::constants::{DOCUMENT_FILENAME, FILE_DOCUMENT_TYPE};
use crate::registry::BinaryManagerRegistry;
use crate::repo::create_unique_record_dir;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use strata_files::{BinaryHandle, BinaryManager};
use strata_types::NonEmptyText;
use strata_uuid::ShardableUuid;

/// A stored document record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: ShardableUuid,

    /// Repository whose binary manager holds the content
    pub repository: NonEmptyText,

    /// Logical folder path, e.g. `/MyFolder`
    pub parent_path: String,

    pub name: NonEmptyText,

    pub doc_type: NonEmptyText,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<NonEmptyText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BinaryHandle>,

    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a document.
#[derive(Clone, Debug)]
pub struct NewDocument {
    pub parent_path: String,
    pub name: NonEmptyText,
    pub doc_type: NonEmptyText,
    pub title: Option<NonEmptyText>,
    pub content: Option<BinaryHandle>,
}

impl NewDocument {
    /// A `File` document named `name` under `parent_path`.
    pub fn file(parent_path: impl Into<String>, name: NonEmptyText) -> Self {
        Self {
            parent_path: parent_path.into(),
            name,
            doc_type: NonEmptyText::new(FILE_DOCUMENT_TYPE).expect("File is non-empty"),
            title: None,
            content: None,
        }
    }

    pub fn with_title(mut self, title: NonEmptyText) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_content(mut self, content: BinaryHandle) -> Self {
        self.content = Some(content);
        self
    }
}

/// Creates and reads document records for one repository.
#[derive(Clone, Debug)]
pub struct DocumentService {
    cfg: Arc<CoreConfig>,
    registry: Arc<BinaryManagerRegistry>,
    repository: NonEmptyText,
}

impl DocumentService {
    /// Service bound to the registry's default repository.
    pub fn new(cfg: Arc<CoreConfig>, registry: Arc<BinaryManagerRegistry>) -> Self {
        let repository = registry.default_repository().clone();
        Self {
            cfg,
            registry,
            repository,
        }
    }

    /// Service bound to a named repository.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownRepository`] if the registry has no such repository.
    pub fn for_repository(
        cfg: Arc<CoreConfig>,
        registry: Arc<BinaryManagerRegistry>,
        repository: &str,
    ) -> CoreResult<Self> {
        registry.resolve(repository)?;
        Ok(Self {
            cfg,
            registry,
            repository: NonEmptyText::new(repository)?,
        })
    }

    pub fn repository(&self) -> &NonEmptyText {
        &self.repository
    }

    /// Binary manager of this service's repository.
    pub fn binary_manager(&self) -> CoreResult<Arc<dyn BinaryManager>> {
        self.registry.resolve(self.repository.as_str())
    }

    /// Creates a document record and returns its identifier.
    ///
    /// If the document has content, its digest must already be stored in this repository and
    /// the handle's length must match the stored length. How the content got there (managed
    /// upload or out-of-band adoption) makes no difference.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Files`] wrapping `NotFound` for a handle whose digest is not stored
    /// - [`CoreError::InvalidInput`] for a handle whose length disagrees with the store
    /// - directory, serialisation or write failures
    pub fn create_document(&self, new: NewDocument) -> CoreResult<ShardableUuid> {
        if let Some(handle) = &new.content {
            let binary = self.binary_manager()?.get_binary_by_digest(&handle.digest)?;
            if binary.length != handle.length {
                return Err(CoreError::InvalidInput(format!(
                    "handle length {} does not match stored length {} for {}",
                    handle.length, binary.length, handle.digest
                )));
            }
        }

        let (id, record_dir) =
            create_unique_record_dir(&self.cfg.documents_dir(), ShardableUuid::new)?;

        let document = Document {
            id: id.clone(),
            repository: self.repository.clone(),
            parent_path: new.parent_path,
            name: new.name,
            doc_type: new.doc_type,
            title: new.title,
            content: new.content,
            created_at: Utc::now(),
        };

        if let Err(e) = write_record(&record_dir, &document) {
            let _ = fs::remove_dir_all(&record_dir);
            return Err(e);
        }

        tracing::debug!(
            document = %id,
            digest = ?document.content.as_ref().map(|c| c.digest.as_str()),
            "created document"
        );
        Ok(id)
    }

    /// Loads a document record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DocumentNotFound`] if no record exists for `id`.
    pub fn get_document(&self, id: &ShardableUuid) -> CoreResult<Document> {
        let path = id
            .sharded_dir(&self.cfg.documents_dir())
            .join(DOCUMENT_FILENAME);

        let yaml = match fs::read_to_string(&path) {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::DocumentNotFound(id.to_string()));
            }
            Err(e) => return Err(CoreError::FileRead(e)),
        };

        serde_yaml::from_str(&yaml).map_err(CoreError::YamlDeserialization)
    }

    /// Opens the content attached to `document` for streaming.
    pub fn open_content(&self, document: &Document) -> CoreResult<Box<dyn Read + Send>> {
        let handle = document
            .content
            .as_ref()
            .ok_or_else(|| CoreError::NoContent(document.id.to_string()))?;
        let manager = self.registry.resolve(document.repository.as_str())?;
        Ok(manager.open(&handle.digest)?)
    }

    /// Reads the content attached to `document`.
    ///
    /// The content is fetched by digest through the binary manager of the repository the
    /// document was created in.
    pub fn read_content(&self, document: &Document) -> CoreResult<Vec<u8>> {
        let mut content = Vec::new();
        self.open_content(document)?
            .read_to_end(&mut content)
            .map_err(CoreError::FileRead)?;
        Ok(content)
    }

    /// Lists every document record, oldest first.
    ///
    /// Records that cannot be parsed are logged and skipped.
    pub fn list_documents(&self) -> CoreResult<Vec<Document>> {
        let base = self.cfg.documents_dir();
        let mut documents = Vec::new();

        let s1_iter = match fs::read_dir(&base) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(documents),
            Err(e) => return Err(CoreError::FileRead(e)),
        };

        for s1 in s1_iter.flatten() {
            let Ok(s2_iter) = fs::read_dir(s1.path()) else {
                continue;
            };
            for s2 in s2_iter.flatten() {
                let Ok(id_iter) = fs::read_dir(s2.path()) else {
                    continue;
                };
                for id_ent in id_iter.flatten() {
                    let record = id_ent.path().join(DOCUMENT_FILENAME);
                    if !record.is_file() {
                        continue;
                    }

                    let parsed = fs::read_to_string(&record)
                        .ok()
                        .and_then(|yaml| serde_yaml::from_str::<Document>(&yaml).ok());
                    match parsed {
                        Some(document) => documents.push(document),
                        None => {
                            tracing::warn!("failed to parse document: {}", record.display())
                        }
                    }
                }
            }
        }

        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(documents)
    }
}

/// Writes `document.yaml` into `record_dir` through a staged file.
fn write_record(record_dir: &Path, document: &Document) -> CoreResult<()> {
    let yaml = serde_yaml::to_string(document).map_err(CoreError::YamlSerialization)?;

    let mut staged = tempfile::NamedTempFile::new_in(record_dir).map_err(CoreError::FileWrite)?;
    staged
        .write_all(yaml.as_bytes())
        .map_err(CoreError::FileWrite)?;
    staged
        .persist(record_dir.join(DOCUMENT_FILENAME))
        .map_err(|e| CoreError::FileWrite(e.error))?;
    Ok(())
}
