//! Error types for publishing the merged archive.
//!
//! Every variant leaves the destination without a partially written
//! artifact: writes go to a staging file that is discarded on failure.

use camino::Utf8PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Errors arising while writing the aggregate archive.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The destination directory could not be created.
    #[error("cannot create destination directory {path}")]
    CreateDestination {
        /// The destination directory.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A staging file could not be created in the destination.
    #[error("destination directory {path} is not writable")]
    NotWritable {
        /// The destination directory.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Writing an entry or finalising the archive failed.
    #[error("failed to write {entry} into {path}")]
    Write {
        /// The archive being written.
        path: Utf8PathBuf,
        /// The entry being written, or `<central directory>` when finishing.
        entry: String,
        /// The zip encoder failure.
        #[source]
        source: ZipError,
    },

    /// Copying entry bytes into the archive failed, for example on a full disk.
    #[error("failed to write contents of {entry} into {path}")]
    WriteContent {
        /// The archive being written.
        path: Utf8PathBuf,
        /// The entry being written.
        entry: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The staging file could not be moved over the final artifact path.
    #[error("failed to move archive into place at {path}")]
    Persist {
        /// The final artifact path.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The published archive could not be read back for digesting.
    #[error("failed to compute digest of {path}")]
    Digest {
        /// The published archive.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
