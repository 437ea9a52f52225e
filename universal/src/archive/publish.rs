//! Writing the merged archive to its published location.
//!
//! The archive is staged in a temporary file inside the destination
//! directory and then renamed over the final path, so readers never see a
//! partially written artifact and a failed publish leaves any previous
//! artifact untouched.

use super::merge::MergeResult;
use super::naming::{NameTemplate, Version};
use super::publish_error::PublishError;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Prefix of the staging file created next to the artifact.
const STAGING_PREFIX: &str = ".universal-jar-";

/// Label used in errors raised while writing the central directory.
const CENTRAL_DIRECTORY: &str = "<central directory>";

/// Permission bits kept from each entry's recorded unix mode.
const PERMISSION_MASK: u32 = 0o777;

/// The archive written by [`publish`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedArtifact {
    path: Utf8PathBuf,
    entry_count: usize,
}

impl PublishedArtifact {
    /// Full path of the published file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Number of entries written.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }
}

/// Write `result` to `destination/<template rendered with version>`.
///
/// The destination directory is created if absent and an existing file of
/// the same name is replaced. Entry timestamps are fixed to the zip epoch,
/// so identical merge results always publish byte-identical archives.
///
/// # Errors
///
/// Returns a [`PublishError`] if the destination cannot be created or
/// written, or if the staged archive cannot be moved into place.
pub fn publish(
    result: &MergeResult,
    destination: &Utf8Path,
    template: &NameTemplate,
    version: &Version,
) -> Result<PublishedArtifact, PublishError> {
    fs::create_dir_all(destination).map_err(|source| PublishError::CreateDestination {
        path: destination.to_owned(),
        source,
    })?;

    let target = destination.join(template.render(version).filename());
    let mut staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(destination)
        .map_err(|source| PublishError::NotWritable {
            path: destination.to_owned(),
            source,
        })?;
    debug!("staging {target} at {}", staging.path().display());

    write_archive(result, staging.as_file_mut(), &target)?;
    make_world_readable(&staging, &target)?;
    staging
        .persist(&target)
        .map_err(|err| PublishError::Persist {
            path: target.clone(),
            source: err.error,
        })?;

    info!("published {target} ({} entries)", result.len());

    Ok(PublishedArtifact {
        path: target,
        entry_count: result.len(),
    })
}

fn write_archive(
    result: &MergeResult,
    file: &mut File,
    target: &Utf8Path,
) -> Result<(), PublishError> {
    let mut writer = ZipWriter::new(BufWriter::new(file));

    for entry in result.entries() {
        let metadata = entry.metadata();
        let options = entry_options(metadata.compression(), metadata.unix_mode());
        let write_err = |source| PublishError::Write {
            path: target.to_owned(),
            entry: entry.path().to_owned(),
            source,
        };

        if metadata.is_dir() {
            writer
                .add_directory(entry.path(), options)
                .map_err(write_err)?;
            continue;
        }

        writer.start_file(entry.path(), options).map_err(write_err)?;
        writer
            .write_all(entry.content())
            .map_err(|source| PublishError::WriteContent {
                path: target.to_owned(),
                entry: entry.path().to_owned(),
                source,
            })?;
    }

    let mut buffered = writer.finish().map_err(|source| PublishError::Write {
        path: target.to_owned(),
        entry: CENTRAL_DIRECTORY.to_owned(),
        source,
    })?;
    buffered.flush().map_err(|source| PublishError::WriteContent {
        path: target.to_owned(),
        entry: CENTRAL_DIRECTORY.to_owned(),
        source,
    })
}

/// Stored entries stay stored; every other method is re-encoded deflated.
fn entry_options(compression: CompressionMethod, unix_mode: Option<u32>) -> SimpleFileOptions {
    let method = if compression == CompressionMethod::Stored {
        CompressionMethod::Stored
    } else {
        CompressionMethod::Deflated
    };
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(DateTime::default());
    match unix_mode {
        Some(mode) => options.unix_permissions(mode & PERMISSION_MASK),
        None => options,
    }
}

/// Staging files are created owner-only; published artifacts are not.
#[cfg(unix)]
fn make_world_readable(staging: &NamedTempFile, target: &Utf8Path) -> Result<(), PublishError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(staging.path(), fs::Permissions::from_mode(0o644)).map_err(|source| {
        PublishError::Persist {
            path: target.to_owned(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_world_readable(_staging: &NamedTempFile, _target: &Utf8Path) -> Result<(), PublishError> {
    Ok(())
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
