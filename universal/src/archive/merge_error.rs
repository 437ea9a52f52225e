//! Error types for reading and merging module archives.
//!
//! Any of these aborts the whole merge; no partial result is produced.

use camino::Utf8PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Errors arising while reading input archives.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The input archive could not be opened.
    #[error("cannot open archive {path}")]
    Open {
        /// The input archive.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The input is not a readable zip archive.
    #[error("archive {path} is corrupt or not a zip file")]
    Corrupt {
        /// The input archive.
        path: Utf8PathBuf,
        /// The zip decoding failure.
        #[source]
        source: ZipError,
    },

    /// An entry's header could not be read.
    #[error("cannot read entry #{index} of {path}")]
    Entry {
        /// The input archive.
        path: Utf8PathBuf,
        /// Position of the entry in the central directory.
        index: usize,
        /// The zip decoding failure.
        #[source]
        source: ZipError,
    },

    /// An entry's contents could not be decompressed.
    #[error("cannot read {entry} from {path}")]
    Read {
        /// The input archive.
        path: Utf8PathBuf,
        /// The entry being read.
        entry: String,
        /// The underlying failure, including checksum mismatches.
        #[source]
        source: std::io::Error,
    },

    /// An entry name is absolute or climbs out of the archive root.
    #[error("archive {path} contains unsafe entry path {entry}")]
    UnsafeEntryPath {
        /// The input archive.
        path: Utf8PathBuf,
        /// The offending entry name.
        entry: String,
    },
}
