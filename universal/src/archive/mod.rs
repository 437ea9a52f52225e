//! Archive merging, naming, and publication.
//!
//! Module archives are zip containers (jar files). The merger reads them in a
//! fixed order into an in-memory [`merge::MergeResult`] using a
//! first-writer-wins policy for duplicate paths; the publisher names the
//! result from a version template and writes it atomically.
//!
//! # Sub-modules
//!
//! - [`entry`] - Archive entries and their metadata (`ArchiveEntry`).
//! - [`error`] - Validation errors for templates and versions.
//! - [`merge`] - First-writer-wins archive merging (`merge`, `MergeResult`).
//! - [`merge_error`] - Error types for reading input archives.
//! - [`naming`] - Version-qualified artifact naming (`NameTemplate`).
//! - [`publish`] - Writing the merged archive (`publish`, `PublishedArtifact`).
//! - [`publish_error`] - Error types for publication.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).

pub mod entry;
pub mod error;
pub mod merge;
pub mod merge_error;
pub mod naming;
pub mod publish;
pub mod publish_error;
pub mod sha256_digest;
