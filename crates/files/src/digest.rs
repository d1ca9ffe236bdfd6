//! Digest computation over arbitrary-length streams.
//!
//! The digest of a binary is the lowercase hex encoding of a cryptographic hash of its full
//! content. The algorithm is store-wide configuration: it is fixed when a store is configured
//! and every component that needs to locate a binary (including tooling that writes into the
//! store out of band) must use the same one.

use crate::{FilesError, FilesResult};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest as _, Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Smallest read buffer used while hashing.
pub const MIN_BUF_SIZE: usize = 8 * 1024;

/// Largest read buffer used while hashing.
pub const MAX_BUF_SIZE: usize = 1024 * 1024;

/// Hash algorithms a store can be configured with.
///
/// `Md5` and `Sha1` exist so that stores laid out by older systems can be read and extended.
/// New stores should use a SHA-2 variant or BLAKE3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Blake3,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 7] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Blake3,
    ];

    /// Canonical configuration name, e.g. `SHA-256`.
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha224 => "SHA-224",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
            DigestAlgorithm::Blake3 => "BLAKE3",
        }
    }

    /// Length of a digest produced by this algorithm, in hex characters.
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Sha1 => 40,
            DigestAlgorithm::Sha224 => 56,
            DigestAlgorithm::Sha256 | DigestAlgorithm::Blake3 => 64,
            DigestAlgorithm::Sha384 => 96,
            DigestAlgorithm::Sha512 => 128,
        }
    }

    /// Starts a fresh incremental hash.
    pub fn hasher(self) -> DigestHasher {
        match self {
            DigestAlgorithm::Md5 => DigestHasher::Md5(Md5::new()),
            DigestAlgorithm::Sha1 => DigestHasher::Sha1(Sha1::new()),
            DigestAlgorithm::Sha224 => DigestHasher::Sha224(Sha224::new()),
            DigestAlgorithm::Sha256 => DigestHasher::Sha256(Sha256::new()),
            DigestAlgorithm::Sha384 => DigestHasher::Sha384(Sha384::new()),
            DigestAlgorithm::Sha512 => DigestHasher::Sha512(Sha512::new()),
            DigestAlgorithm::Blake3 => DigestHasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    /// Checks that `digest` has the length this algorithm produces.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidDigest`] on a length mismatch.
    pub fn validate_digest(self, digest: &Digest) -> FilesResult<()> {
        if digest.as_str().len() != self.hex_len() {
            return Err(FilesError::InvalidDigest(format!(
                "{} digest must be {} hex characters, got {}: '{}'",
                self.name(),
                self.hex_len(),
                digest.as_str().len(),
                digest
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = FilesError;

    /// Parses an algorithm name. Case is ignored, as are `-` and `_` separators, so `sha256`,
    /// `SHA-256` and `sha_256` all resolve to [`DigestAlgorithm::Sha256`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalised.as_str() {
            "MD5" => Ok(DigestAlgorithm::Md5),
            "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA224" => Ok(DigestAlgorithm::Sha224),
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            "BLAKE3" => Ok(DigestAlgorithm::Blake3),
            _ => Err(FilesError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl serde::Serialize for DigestAlgorithm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for DigestAlgorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A lowercase hexadecimal content digest.
///
/// The characters are restricted to `0-9a-f`, so a `Digest` can always be used as a path
/// component without escaping the store.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(String);

impl Digest {
    /// Validates a digest string.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidDigest`] if `input` is empty, has odd length, or contains
    /// anything other than lowercase hex characters.
    pub fn parse(input: &str) -> FilesResult<Self> {
        if input.is_empty() || input.len() % 2 != 0 {
            return Err(FilesError::InvalidDigest(format!(
                "digest must be a non-empty, even-length hex string, got: '{}'",
                input
            )));
        }
        if !input
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(FilesError::InvalidDigest(format!(
                "digest must contain only lowercase hex characters, got: '{}'",
                input
            )));
        }
        Ok(Self(input.to_owned()))
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::parse(s)
    }
}

impl serde::Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Digest::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Incremental hash state for one of the supported algorithms.
pub enum DigestHasher {
    Md5(Md5),
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl DigestHasher {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            DigestHasher::Md5(h) => h.update(data),
            DigestHasher::Sha1(h) => h.update(data),
            DigestHasher::Sha224(h) => h.update(data),
            DigestHasher::Sha256(h) => h.update(data),
            DigestHasher::Sha384(h) => h.update(data),
            DigestHasher::Sha512(h) => h.update(data),
            DigestHasher::Blake3(h) => {
                h.update(data);
            }
        }
    }

    pub fn finalize(self) -> Digest {
        match self {
            DigestHasher::Md5(h) => Digest::from_bytes(&h.finalize()),
            DigestHasher::Sha1(h) => Digest::from_bytes(&h.finalize()),
            DigestHasher::Sha224(h) => Digest::from_bytes(&h.finalize()),
            DigestHasher::Sha256(h) => Digest::from_bytes(&h.finalize()),
            DigestHasher::Sha384(h) => Digest::from_bytes(&h.finalize()),
            DigestHasher::Sha512(h) => Digest::from_bytes(&h.finalize()),
            DigestHasher::Blake3(h) => Digest::from_bytes(h.finalize().as_bytes()),
        }
    }
}

impl fmt::Debug for DigestHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = match self {
            DigestHasher::Md5(_) => DigestAlgorithm::Md5,
            DigestHasher::Sha1(_) => DigestAlgorithm::Sha1,
            DigestHasher::Sha224(_) => DigestAlgorithm::Sha224,
            DigestHasher::Sha256(_) => DigestAlgorithm::Sha256,
            DigestHasher::Sha384(_) => DigestAlgorithm::Sha384,
            DigestHasher::Sha512(_) => DigestAlgorithm::Sha512,
            DigestHasher::Blake3(_) => DigestAlgorithm::Blake3,
        };
        f.debug_tuple("DigestHasher").field(&algorithm).finish()
    }
}

/// Picks a read buffer size from an optional length hint.
///
/// Length hints are advisory and frequently wrong (zero for pipes, stale for growing files), so
/// the hint only ever selects a size inside `[MIN_BUF_SIZE, MAX_BUF_SIZE]`. A missing or zero
/// hint selects the maximum.
pub fn buffer_size_for(hint: Option<u64>) -> usize {
    match hint {
        None | Some(0) => MAX_BUF_SIZE,
        Some(n) => usize::try_from(n)
            .unwrap_or(MAX_BUF_SIZE)
            .clamp(MIN_BUF_SIZE, MAX_BUF_SIZE),
    }
}

/// Computes the digest of everything `reader` yields.
///
/// The reader is consumed and dropped before this returns, whether hashing succeeds or not.
///
/// # Errors
///
/// Returns [`FilesError::Io`] if a read fails. Reads are not retried beyond
/// `ErrorKind::Interrupted`.
pub fn compute_digest<R: Read>(reader: R, algorithm: DigestAlgorithm) -> FilesResult<Digest> {
    compute_digest_with_hint(reader, algorithm, None)
}

/// Like [`compute_digest`], with a length hint used only to size the read buffer.
pub fn compute_digest_with_hint<R: Read>(
    mut reader: R,
    algorithm: DigestAlgorithm,
    hint: Option<u64>,
) -> FilesResult<Digest> {
    let mut hasher = algorithm.hasher();
    pump(&mut reader, Some(&mut hasher), &mut io::sink(), hint)?;
    Ok(hasher.finalize())
}

/// Digest of an in-memory byte slice.
pub fn digest_bytes(bytes: &[u8], algorithm: DigestAlgorithm) -> Digest {
    let mut hasher = algorithm.hasher();
    hasher.update(bytes);
    hasher.finalize()
}

/// Digest of a file on disk, using its metadata length as the buffer hint.
pub fn digest_file(path: &Path, algorithm: DigestAlgorithm) -> FilesResult<Digest> {
    let file = fs::File::open(path)?;
    let hint = file.metadata().ok().map(|m| m.len());
    compute_digest_with_hint(file, algorithm, hint)
}

/// Copies `reader` into `writer`, feeding every chunk to `hasher` when one is given.
///
/// Returns the number of bytes copied.
pub(crate) fn pump<R, W>(
    reader: &mut R,
    mut hasher: Option<&mut DigestHasher>,
    writer: &mut W,
    hint: Option<u64>,
) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; buffer_size_for(hint)];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if let Some(h) = hasher.as_deref_mut() {
            h.update(&buf[..n]);
        }
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    const HELLO_SHA256: &str = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";

    #[test]
    fn test_known_sha256_vector() {
        let digest = compute_digest(Cursor::new(b"Hello, World!"), DigestAlgorithm::Sha256).unwrap();
        assert_eq!(digest.as_str(), HELLO_SHA256);
    }

    #[test]
    fn test_known_legacy_vectors() {
        let md5 = digest_bytes(b"Hello, World!", DigestAlgorithm::Md5);
        assert_eq!(md5.as_str(), "65a8e27d8879283831b664bd8b7f0ad4");

        let sha1 = digest_bytes(b"Hello, World!", DigestAlgorithm::Sha1);
        assert_eq!(sha1.as_str(), "0a0a9f2a6772942557ab5355d76af442f8f65e01");
    }

    #[test]
    fn test_empty_input_sha256() {
        let digest = compute_digest(io::empty(), DigestAlgorithm::Sha256).unwrap();
        assert_eq!(
            digest.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        for algorithm in DigestAlgorithm::ALL {
            let first = compute_digest(Cursor::new(&data), algorithm).unwrap();
            let second = compute_digest(Cursor::new(&data), algorithm).unwrap();
            assert_eq!(first, second, "{} not deterministic", algorithm);
            assert_eq!(first.as_str().len(), algorithm.hex_len());
            assert_eq!(first, digest_bytes(&data, algorithm));
        }
    }

    #[test]
    fn test_buffer_hint_does_not_change_digest() {
        let data = vec![7u8; 3 * MAX_BUF_SIZE + 17];
        let expected = digest_bytes(&data, DigestAlgorithm::Sha256);

        for hint in [None, Some(0), Some(1), Some(data.len() as u64), Some(u64::MAX)] {
            let digest =
                compute_digest_with_hint(Cursor::new(&data), DigestAlgorithm::Sha256, hint)
                    .unwrap();
            assert_eq!(digest, expected, "hint {:?}", hint);
        }
    }

    #[test]
    fn test_buffer_size_is_clamped() {
        assert_eq!(buffer_size_for(None), MAX_BUF_SIZE);
        assert_eq!(buffer_size_for(Some(0)), MAX_BUF_SIZE);
        assert_eq!(buffer_size_for(Some(10)), MIN_BUF_SIZE);
        assert_eq!(buffer_size_for(Some(100_000)), 100_000);
        assert_eq!(buffer_size_for(Some(u64::MAX)), MAX_BUF_SIZE);
    }

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!(
            "SHA-256".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha256
        );
        assert_eq!(
            "sha_512".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha512
        );
        assert_eq!(
            "blake3".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Blake3
        );
        assert_eq!("md5".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Md5);
        assert_eq!("SHA1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        for algorithm in DigestAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<DigestAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_unsupported_algorithm() {
        for name in ["MD4", "SHA-3", "whirlpool", ""] {
            let result = name.parse::<DigestAlgorithm>();
            assert!(
                matches!(result, Err(FilesError::UnsupportedAlgorithm(_))),
                "{} should be unsupported",
                name
            );
        }
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
            buf[0] = 1;
            Ok(1)
        }
    }

    #[test]
    fn test_read_error_is_propagated() {
        let result = compute_digest(FailingReader { remaining_ok: 3 }, DigestAlgorithm::Sha256);
        match result {
            Err(FilesError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    struct InterruptOnce {
        interrupted: bool,
        inner: Cursor<&'static [u8]>,
    }

    impl Read for InterruptOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_interrupted_read_is_retried() {
        let reader = InterruptOnce {
            interrupted: false,
            inner: Cursor::new(&b"Hello, World!"[..]),
        };
        let digest = compute_digest(reader, DigestAlgorithm::Sha256).unwrap();
        assert_eq!(digest.as_str(), HELLO_SHA256);
    }

    #[test]
    fn test_digest_parse_validation() {
        assert!(Digest::parse("abcdef01").is_ok());
        assert!(matches!(Digest::parse(""), Err(FilesError::InvalidDigest(_))));
        assert!(matches!(Digest::parse("abc"), Err(FilesError::InvalidDigest(_))));
        assert!(matches!(Digest::parse("ABCD"), Err(FilesError::InvalidDigest(_))));
        assert!(matches!(Digest::parse("../.."), Err(FilesError::InvalidDigest(_))));
    }

    #[test]
    fn test_validate_digest_length() {
        let short = Digest::parse("abcd").unwrap();
        assert!(DigestAlgorithm::Sha256.validate_digest(&short).is_err());

        let full = Digest::parse(HELLO_SHA256).unwrap();
        assert!(DigestAlgorithm::Sha256.validate_digest(&full).is_ok());
        assert!(DigestAlgorithm::Sha512.validate_digest(&full).is_err());
    }

    #[test]
    fn test_digest_file_matches_stream() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("blob.bin");
        fs::write(&path, b"Hello, World!").unwrap();

        let digest = digest_file(&path, DigestAlgorithm::Sha256).unwrap();
        assert_eq!(digest.as_str(), HELLO_SHA256);
    }
}
