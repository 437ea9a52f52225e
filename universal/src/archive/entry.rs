//! Archive entries and the metadata carried through a merge.

use zip::CompressionMethod;

/// Permission bits that mark an entry as executable.
const EXECUTABLE_BITS: u32 = 0o111;

/// Metadata preserved for each entry between reading and publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    is_dir: bool,
    compression: CompressionMethod,
    unix_mode: Option<u32>,
}

impl EntryMetadata {
    /// Metadata for a regular file entry.
    #[must_use]
    pub fn file(compression: CompressionMethod, unix_mode: Option<u32>) -> Self {
        Self {
            is_dir: false,
            compression,
            unix_mode,
        }
    }

    /// Metadata for a directory entry.
    #[must_use]
    pub fn directory(unix_mode: Option<u32>) -> Self {
        Self {
            is_dir: true,
            compression: CompressionMethod::Stored,
            unix_mode,
        }
    }

    /// Whether the entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Compression method the entry was stored with.
    #[must_use]
    pub fn compression(&self) -> CompressionMethod {
        self.compression
    }

    /// Unix mode recorded in the source archive, if any.
    #[must_use]
    pub fn unix_mode(&self) -> Option<u32> {
        self.unix_mode
    }

    /// Whether any execute permission bit is set.
    #[must_use]
    pub fn is_executable(&self) -> bool {
        self.unix_mode
            .is_some_and(|mode| mode & EXECUTABLE_BITS != 0)
    }
}

/// One named entry of an archive.
///
/// The relative path uniquely identifies the entry within an archive.
/// Directory paths end in `/`, as they do inside zip files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    path: String,
    content: Vec<u8>,
    metadata: EntryMetadata,
}

impl ArchiveEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(path: impl Into<String>, content: Vec<u8>, metadata: EntryMetadata) -> Self {
        Self {
            path: path.into(),
            content,
            metadata,
        }
    }

    /// Relative path of the entry within its archive.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Uncompressed entry bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Entry metadata.
    #[must_use]
    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }
}
