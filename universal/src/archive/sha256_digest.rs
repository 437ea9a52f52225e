//! SHA-256 digest of a published archive.
//!
//! Digests identify a published artifact's exact bytes, which is how
//! repeated builds of identical inputs are shown to be reproducible.

use camino::Utf8Path;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};

/// A lowercase hex-encoded SHA-256 digest.
///
/// # Examples
///
/// ```
/// use universal_jar::archive::sha256_digest::Sha256Digest;
///
/// let digest = Sha256Digest::of_bytes(b"");
/// assert_eq!(
///     digest.as_str(),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Digest of an in-memory byte slice.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self::from_hasher(hasher)
    }

    /// Digest of a file's contents, read in chunks.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while opening or reading the file.
    pub fn of_file(path: &Utf8Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];
        loop {
            let bytes_read = file.read(&mut buffer)?;
            let Some(chunk) = buffer.get(..bytes_read).filter(|chunk| !chunk.is_empty()) else {
                break;
            };
            hasher.update(chunk);
        }
        Ok(Self::from_hasher(hasher))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_hasher(hasher: Sha256) -> Self {
        Self(format!("{:x}", hasher.finalize()))
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
