//! Filesystem backend of the binary store.
//!
//! # Storage Layout
//!
//! ```text
//! <storage_root>/
//! ├── data/              # content-addressed binaries
//! │   └── ab/            # one directory per shard level
//! │       └── cd/
//! │           └── abcd…  # full digest as filename
//! └── tmp/               # staging area for in-flight writes
//! ```
//!
//! Every write goes to a uniquely named file under `tmp/`, is flushed to disk, and is then moved
//! to its digest path without clobbering. Readers therefore only ever observe absent or complete
//! binaries, and concurrent writers of the same content need no lock: whoever loses the final
//! move discards its staged copy.

use crate::constants::{DATA_DIR_NAME, STAGING_DIR_NAME, STAGING_FILE_PREFIX};
use crate::digest::{compute_digest_with_hint, pump, Digest, DigestHasher};
use crate::shard::ShardDescriptor;
use crate::{FilesError, FilesResult};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A binary held by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBinary {
    /// Digest of the content, also the file name
    pub digest: Digest,

    /// Size of the content in bytes
    pub length: u64,

    /// Absolute path of the stored file
    pub path: PathBuf,
}

/// How [`FsBinaryStore::adopt_external_file`] treats the claimed digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdoptMode {
    /// Rehash the source while copying and reject it if the digest differs.
    #[default]
    Verify,

    /// Copy the source under the claimed digest without rehashing.
    ///
    /// The caller vouches for the digest. A wrong claim leaves content in the store that does
    /// not match its address.
    Trust,
}

/// Totals over the binaries currently stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub binary_count: u64,
    pub total_bytes: u64,
}

/// Content-addressed binary store rooted in a local directory.
///
/// The store is cheap to clone and holds no locks; any number of threads or processes may use
/// the same root concurrently.
#[derive(Clone, Debug)]
pub struct FsBinaryStore {
    root: PathBuf,
    descriptor: ShardDescriptor,
}

impl FsBinaryStore {
    /// Opens (creating if necessary) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `root` exists but is not a directory
    /// - the `data/` or `tmp/` directories cannot be created
    /// - the root cannot be canonicalised
    pub fn open(root: &Path, descriptor: ShardDescriptor) -> FilesResult<Self> {
        if root.exists() && !root.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root.display()
            )));
        }

        for dir in [root.join(DATA_DIR_NAME), root.join(STAGING_DIR_NAME)] {
            fs::create_dir_all(&dir).map_err(|e| {
                FilesError::Io(io::Error::new(
                    e.kind(),
                    format!("Failed to create store directory {}: {}", dir.display(), e),
                ))
            })?;
        }

        let root = root.canonicalize().map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root.display(),
                e
            ))
        })?;

        tracing::debug!(
            root = %root.display(),
            algorithm = %descriptor.algorithm(),
            depth = descriptor.depth(),
            "opened binary store"
        );

        Ok(Self { root, descriptor })
    }

    /// Root directory of the store.
    ///
    /// Exposed for out-of-band tooling (backup, migration, injection). Such tooling must place
    /// files under [`Self::data_dir`] at the path [`crate::resolve_relative_path`] gives.
    pub fn storage_root(&self) -> &Path {
        &self.root
    }

    /// Directory the sharded relative paths are joined onto.
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR_NAME)
    }

    fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR_NAME)
    }

    pub fn descriptor(&self) -> ShardDescriptor {
        self.descriptor
    }

    /// Absolute path at which `digest` is (or would be) stored.
    pub fn path_for(&self, digest: &Digest) -> FilesResult<PathBuf> {
        Ok(self.data_dir().join(self.descriptor.resolve(digest)?))
    }

    /// Stores everything `reader` yields.
    ///
    /// Content already present is not written again; the existing binary is reported instead.
    pub fn store<R: Read>(&self, reader: R) -> FilesResult<StoredBinary> {
        self.store_with_hint(reader, None)
    }

    /// Like [`Self::store`], with a length hint used only to size the copy buffer.
    pub fn store_with_hint<R: Read>(
        &self,
        mut reader: R,
        hint: Option<u64>,
    ) -> FilesResult<StoredBinary> {
        let mut hasher = self.descriptor.algorithm().hasher();
        let (staged, length) = self.stage(&mut reader, Some(&mut hasher), hint)?;
        drop(reader);

        self.commit(staged, hasher.finalize(), length)
    }

    /// Opens a stored binary for reading.
    ///
    /// # Errors
    ///
    /// - [`FilesError::NotFound`] if nothing is stored under `digest`
    /// - [`FilesError::InvalidDigest`] if `digest` does not fit the configured algorithm
    pub fn fetch(&self, digest: &Digest) -> FilesResult<File> {
        let path = self.path_for(digest)?;
        File::open(&path).map_err(|e| not_found_or_io(e, digest))
    }

    /// Metadata of a stored binary, without opening it.
    pub fn stored(&self, digest: &Digest) -> FilesResult<StoredBinary> {
        let path = self.path_for(digest)?;
        let metadata = fs::metadata(&path).map_err(|e| not_found_or_io(e, digest))?;
        if !metadata.is_file() {
            return Err(FilesError::NotFound(digest.clone()));
        }

        Ok(StoredBinary {
            digest: digest.clone(),
            length: metadata.len(),
            path,
        })
    }

    pub fn contains(&self, digest: &Digest) -> FilesResult<bool> {
        Ok(self.path_for(digest)?.is_file())
    }

    pub fn length(&self, digest: &Digest) -> FilesResult<u64> {
        Ok(self.stored(digest)?.length)
    }

    /// Brings a file that was produced outside the store under its management.
    ///
    /// This is the supported way to pre-populate a store offline: the caller computes the
    /// digest with the store's algorithm and hands over the file, and the store places it with
    /// the same staged write as [`Self::store`]. With [`AdoptMode::Verify`] the source is
    /// always rehashed, even when `expected` is already stored. With [`AdoptMode::Trust`] an
    /// already stored `expected` is returned without reading the source.
    ///
    /// # Errors
    ///
    /// - [`FilesError::DigestMismatch`] in verify mode when the content does not hash to
    ///   `expected`; nothing is stored
    /// - [`FilesError::InvalidDigest`] if `expected` does not fit the configured algorithm
    /// - [`FilesError::Io`] if the source cannot be read
    pub fn adopt_external_file(
        &self,
        source: &Path,
        expected: &Digest,
        mode: AdoptMode,
    ) -> FilesResult<StoredBinary> {
        let algorithm = self.descriptor.algorithm();
        algorithm.validate_digest(expected)?;

        let present = self.stored(expected).ok();
        if mode == AdoptMode::Trust {
            if let Some(existing) = present {
                tracing::debug!(digest = %expected, "adopted content already present");
                return Ok(existing);
            }
        }

        let mut file = File::open(source).map_err(|e| {
            FilesError::Io(io::Error::new(
                e.kind(),
                format!("Failed to open source file {}: {}", source.display(), e),
            ))
        })?;
        let hint = file.metadata().ok().map(|m| m.len());

        match mode {
            AdoptMode::Verify => {
                // The source is hashed even when `expected` is present; only the copy is skipped.
                if let Some(existing) = present {
                    let actual = compute_digest_with_hint(&mut file, algorithm, hint)?;
                    if &actual != expected {
                        return Err(digest_mismatch(source, expected, actual));
                    }
                    tracing::debug!(digest = %expected, "adopted content already present");
                    return Ok(existing);
                }

                let mut hasher = algorithm.hasher();
                let (staged, length) = self.stage(&mut file, Some(&mut hasher), hint)?;
                let actual = hasher.finalize();
                if &actual != expected {
                    return Err(digest_mismatch(source, expected, actual));
                }

                tracing::info!(digest = %actual, source = %source.display(), "adopting external file");
                self.commit(staged, actual, length)
            }
            AdoptMode::Trust => {
                tracing::warn!(
                    digest = %expected,
                    source = %source.display(),
                    "adopting external file without verifying its digest"
                );
                let (staged, length) = self.stage(&mut file, None, hint)?;
                self.commit(staged, expected.clone(), length)
            }
        }
    }

    /// Every digest stored under the data directory, sorted.
    ///
    /// Entries that are not at the path their name resolves to are ignored.
    pub fn digests(&self) -> FilesResult<Vec<Digest>> {
        let mut found = Vec::new();
        self.collect_digests(&self.data_dir(), 0, &mut found)?;
        found.sort();
        Ok(found)
    }

    pub fn stats(&self) -> FilesResult<StoreStats> {
        let mut stats = StoreStats::default();
        for digest in self.digests()? {
            stats.binary_count += 1;
            stats.total_bytes += self.length(&digest)?;
        }
        Ok(stats)
    }

    fn collect_digests(&self, dir: &Path, level: usize, found: &mut Vec<Digest>) -> FilesResult<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();

            if level < self.descriptor.depth() {
                if file_type.is_dir() {
                    self.collect_digests(&path, level + 1, found)?;
                }
                continue;
            }

            if !file_type.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if let Ok(digest) = Digest::parse(&name) {
                if self.path_for(&digest).is_ok_and(|expected| expected == path) {
                    found.push(digest);
                }
            }
        }
        Ok(())
    }

    /// Copies `reader` into a fresh file under `tmp/` and flushes it to disk.
    fn stage(
        &self,
        reader: &mut dyn Read,
        hasher: Option<&mut DigestHasher>,
        hint: Option<u64>,
    ) -> FilesResult<(NamedTempFile, u64)> {
        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_FILE_PREFIX)
            .tempfile_in(self.staging_dir())?;

        let length = pump(reader, hasher, staged.as_file_mut(), hint)?;
        staged.as_file().sync_all()?;

        Ok((staged, length))
    }

    /// Moves a staged file to the path of `digest`, unless that path is already taken.
    fn commit(
        &self,
        staged: NamedTempFile,
        digest: Digest,
        length: u64,
    ) -> FilesResult<StoredBinary> {
        let path = self.path_for(&digest)?;

        if path.is_file() {
            tracing::debug!(digest = %digest, "binary already stored");
            return Ok(StoredBinary {
                digest,
                length,
                path,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        match staged.persist_noclobber(&path) {
            Ok(_) => {
                tracing::debug!(digest = %digest, length, "stored binary");
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!(digest = %digest, "binary stored concurrently");
            }
            Err(e) => return Err(FilesError::Io(e.error)),
        }

        Ok(StoredBinary {
            digest,
            length,
            path,
        })
    }
}

fn digest_mismatch(source: &Path, expected: &Digest, actual: Digest) -> FilesError {
    tracing::warn!(
        source = %source.display(),
        expected = %expected,
        actual = %actual,
        "refusing to adopt file with mismatched digest"
    );
    FilesError::DigestMismatch {
        expected: expected.clone(),
        actual,
    }
}

fn not_found_or_io(e: io::Error, digest: &Digest) -> FilesError {
    if e.kind() == io::ErrorKind::NotFound {
        FilesError::NotFound(digest.clone())
    } else {
        FilesError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{compute_digest, digest_bytes, DigestAlgorithm};
    use crate::shard::resolve_relative_path;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn open_store(temp: &TempDir, depth: usize) -> FsBinaryStore {
        let descriptor = ShardDescriptor::new(depth, DigestAlgorithm::Sha256).unwrap();
        FsBinaryStore::open(&temp.path().join("binaries"), descriptor).unwrap()
    }

    fn read_all(store: &FsBinaryStore, digest: &Digest) -> Vec<u8> {
        let mut content = Vec::new();
        store
            .fetch(digest)
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        content
    }

    fn staging_entries(store: &FsBinaryStore) -> usize {
        fs::read_dir(store.storage_root().join(STAGING_DIR_NAME))
            .unwrap()
            .count()
    }

    #[test]
    fn test_open_creates_layout() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        assert!(store.data_dir().is_dir());
        assert!(store.storage_root().join(STAGING_DIR_NAME).is_dir());
        assert!(store.data_dir().starts_with(store.storage_root()));
    }

    #[test]
    fn test_open_rejects_file_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("file.txt");
        fs::write(&root, "not a directory").unwrap();

        let descriptor = ShardDescriptor::new(2, DigestAlgorithm::Sha256).unwrap();
        let result = FsBinaryStore::open(&root, descriptor);

        assert!(matches!(result, Err(FilesError::InvalidRootDirectory(_))));
    }

    #[test]
    fn test_store_and_fetch_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let test_cases = vec![
            b"Plain text content".to_vec(),
            vec![],
            (0..=255).collect::<Vec<u8>>(),
            vec![0xAB; 2 * 1024 * 1024 + 3],
        ];

        for content in test_cases {
            let stored = store.store(Cursor::new(&content)).unwrap();

            assert_eq!(stored.length, content.len() as u64);
            assert_eq!(stored.digest, digest_bytes(&content, DigestAlgorithm::Sha256));
            assert_eq!(read_all(&store, &stored.digest), content);
        }
        assert_eq!(staging_entries(&store), 0);
    }

    #[test]
    fn test_store_places_file_at_sharded_path() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let stored = store.store(Cursor::new(b"Hello, World!")).unwrap();
        let hex = stored.digest.as_str();

        assert_eq!(
            stored.path,
            store
                .data_dir()
                .join(&hex[0..2])
                .join(&hex[2..4])
                .join(hex)
        );
        assert_eq!(fs::read(&stored.path).unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_store_same_content_twice_dedups() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let first = store.store(Cursor::new(b"Same content")).unwrap();
        let second = store.store(Cursor::new(b"Same content")).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.digests().unwrap(), vec![first.digest.clone()]);

        let shard_dir = first.path.parent().unwrap();
        assert_eq!(fs::read_dir(shard_dir).unwrap().count(), 1);
        assert_eq!(staging_entries(&store), 0);
    }

    struct FailingReader {
        remaining_ok: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining_ok == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream reset"));
            }
            self.remaining_ok -= 1;
            let n = buf.len().min(4096);
            buf[..n].fill(0x5A);
            Ok(n)
        }
    }

    #[test]
    fn test_failed_store_leaves_nothing_behind() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let result = store.store(FailingReader { remaining_ok: 5 });

        match result {
            Err(FilesError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("Expected Io error, got {:?}", other),
        }
        assert!(store.digests().unwrap().is_empty());
        assert_eq!(staging_entries(&store), 0);

        // The store stays usable after a failed write.
        let stored = store.store(Cursor::new(b"after failure")).unwrap();
        assert_eq!(read_all(&store, &stored.digest), b"after failure");
    }

    #[test]
    fn test_fetch_missing_digest_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let digest = digest_bytes(b"never stored", DigestAlgorithm::Sha256);

        assert!(matches!(store.fetch(&digest), Err(FilesError::NotFound(d)) if d == digest));
        assert!(matches!(store.stored(&digest), Err(FilesError::NotFound(_))));
        assert!(!store.contains(&digest).unwrap());
    }

    #[test]
    fn test_fetch_wrong_length_digest_is_invalid() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let digest = Digest::parse("abcd").unwrap();
        assert!(matches!(
            store.fetch(&digest),
            Err(FilesError::InvalidDigest(_))
        ));
    }

    #[test]
    fn test_flat_store_layout() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 0);

        let stored = store.store(Cursor::new(b"flat")).unwrap();

        assert_eq!(stored.path, store.data_dir().join(stored.digest.as_str()));
        assert_eq!(store.digests().unwrap(), vec![stored.digest]);
    }

    #[test]
    fn test_externally_written_file_is_readable() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 3);

        let content = b"written without the store";
        let digest = compute_digest(Cursor::new(content), DigestAlgorithm::Sha256).unwrap();
        let target = store
            .data_dir()
            .join(resolve_relative_path(&digest, 3).unwrap());
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, content).unwrap();

        assert!(store.contains(&digest).unwrap());
        assert_eq!(store.length(&digest).unwrap(), content.len() as u64);
        assert_eq!(read_all(&store, &digest), content);

        // The managed path agrees on the location and treats the content as present.
        let stored = store.store(Cursor::new(content)).unwrap();
        assert_eq!(stored.path, target);
        assert_eq!(store.stats().unwrap().binary_count, 1);
    }

    #[test]
    fn test_concurrent_store_same_content() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);
        let content: Vec<u8> = (0..200_000u32).map(|i| (i % 253) as u8).collect();

        let digests: Vec<Digest> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| store.store(Cursor::new(&content)).unwrap().digest))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(digests.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.digests().unwrap(), vec![digests[0].clone()]);
        assert_eq!(read_all(&store, &digests[0]), content);
        assert_eq!(staging_entries(&store), 0);
    }

    #[test]
    fn test_concurrent_store_different_content() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 1);

        std::thread::scope(|scope| {
            for i in 0..16u32 {
                let store = &store;
                scope.spawn(move || {
                    let content = format!("binary number {}", i);
                    store.store(Cursor::new(content.into_bytes())).unwrap();
                });
            }
        });

        let stats = store.stats().unwrap();
        assert_eq!(stats.binary_count, 16);
    }

    #[test]
    fn test_adopt_verified_file() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let source = temp.path().join("sample.txt");
        fs::write(&source, b"adopt me").unwrap();
        let digest = digest_bytes(b"adopt me", DigestAlgorithm::Sha256);

        let stored = store
            .adopt_external_file(&source, &digest, AdoptMode::Verify)
            .unwrap();

        assert_eq!(stored.digest, digest);
        assert_eq!(stored.length, 8);
        assert_eq!(read_all(&store, &digest), b"adopt me");
        // The source is copied, not moved.
        assert!(source.exists());
    }

    #[test]
    fn test_adopt_rejects_mismatched_digest() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let source = temp.path().join("sample.txt");
        fs::write(&source, b"actual content").unwrap();
        let claimed = digest_bytes(b"claimed content", DigestAlgorithm::Sha256);

        let result = store.adopt_external_file(&source, &claimed, AdoptMode::Verify);

        match result {
            Err(FilesError::DigestMismatch { expected, actual }) => {
                assert_eq!(expected, claimed);
                assert_eq!(actual, digest_bytes(b"actual content", DigestAlgorithm::Sha256));
            }
            other => panic!("Expected DigestMismatch, got {:?}", other),
        }
        assert!(store.digests().unwrap().is_empty());
        assert_eq!(staging_entries(&store), 0);
    }

    #[test]
    fn test_adopt_verify_rejects_wrong_file_for_stored_digest() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let stored = store.store(Cursor::new(b"original")).unwrap();
        let source = temp.path().join("other.txt");
        fs::write(&source, b"completely different bytes").unwrap();

        let result = store.adopt_external_file(&source, &stored.digest, AdoptMode::Verify);

        match result {
            Err(FilesError::DigestMismatch { expected, actual }) => {
                assert_eq!(expected, stored.digest);
                assert_eq!(
                    actual,
                    digest_bytes(b"completely different bytes", DigestAlgorithm::Sha256)
                );
            }
            other => panic!("Expected DigestMismatch, got {:?}", other),
        }
        assert_eq!(read_all(&store, &stored.digest), b"original");
        assert_eq!(store.digests().unwrap(), vec![stored.digest]);
    }

    #[test]
    fn test_adopt_verify_matching_file_for_stored_digest() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let stored = store.store(Cursor::new(b"original")).unwrap();
        let source = temp.path().join("same.txt");
        fs::write(&source, b"original").unwrap();

        let adopted = store
            .adopt_external_file(&source, &stored.digest, AdoptMode::Verify)
            .unwrap();

        assert_eq!(adopted, stored);
        assert_eq!(staging_entries(&store), 0);
    }

    #[test]
    fn test_adopt_trusted_file_skips_verification() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let source = temp.path().join("sample.txt");
        fs::write(&source, b"actual content").unwrap();
        let claimed = digest_bytes(b"claimed content", DigestAlgorithm::Sha256);

        let stored = store
            .adopt_external_file(&source, &claimed, AdoptMode::Trust)
            .unwrap();

        assert_eq!(stored.digest, claimed);
        assert_eq!(read_all(&store, &claimed), b"actual content");
    }

    #[test]
    fn test_adopt_missing_source_is_io_error() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);
        let digest = digest_bytes(b"x", DigestAlgorithm::Sha256);

        let result =
            store.adopt_external_file(Path::new("/non-existent/file.txt"), &digest, AdoptMode::Verify);

        assert!(matches!(result, Err(FilesError::Io(_))));
    }

    #[test]
    fn test_digests_ignores_stray_files() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp, 2);

        let stored = store.store(Cursor::new(b"real")).unwrap();
        fs::write(store.data_dir().join("README"), b"stray").unwrap();
        let misplaced = digest_bytes(b"misplaced", DigestAlgorithm::Sha256);
        fs::write(
            stored.path.parent().unwrap().join(misplaced.as_str()),
            b"misplaced",
        )
        .unwrap();

        assert_eq!(store.digests().unwrap(), vec![stored.digest]);
        assert_eq!(
            store.stats().unwrap(),
            StoreStats {
                binary_count: 1,
                total_bytes: 4
            }
        );
    }
}
