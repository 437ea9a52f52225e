//! Error types for archive naming values.
//!
//! Each variant names the invalid input and the constraint that was violated.

use thiserror::Error;

/// Errors arising from invalid artifact naming values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    /// A filename template is empty, lacks exactly one version placeholder,
    /// or would produce a path rather than a filename.
    #[error("invalid name template \"{template}\": {reason}")]
    InvalidTemplate {
        /// The rejected template.
        template: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A version string cannot be embedded in a filename.
    #[error("invalid version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ArchiveError`].
pub type Result<T> = std::result::Result<T, ArchiveError>;
