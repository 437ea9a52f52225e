//! First-writer-wins merging of module archives.
//!
//! Inputs are read in the order given. An entry is imported only if no
//! earlier input already supplied the same relative path; later duplicates
//! are skipped without comparing their contents. Modules commonly bundle the
//! same shaded dependency classes, so duplicates are expected and are never
//! an error.

use super::entry::{ArchiveEntry, EntryMetadata};
use super::merge_error::MergeError;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use zip::ZipArchive;

/// Per-input statistics recorded during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSummary {
    path: Utf8PathBuf,
    imported: usize,
    skipped: usize,
}

impl InputSummary {
    fn new(path: &Utf8Path) -> Self {
        Self {
            path: path.to_owned(),
            imported: 0,
            skipped: 0,
        }
    }

    /// The input archive.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Entries this input contributed to the result.
    #[must_use]
    pub fn imported(&self) -> usize {
        self.imported
    }

    /// Entries skipped because an earlier input already supplied the path.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Ordered mapping from relative path to the entry that won it.
///
/// Iteration follows insertion order: the first input's entries in its
/// own order, then each later input's new paths.
#[derive(Debug, Clone, Default)]
pub struct MergeResult {
    entries: Vec<ArchiveEntry>,
    origins: Vec<Option<usize>>,
    index: HashMap<String, usize>,
    inputs: Vec<InputSummary>,
}

impl MergeResult {
    /// Insert `entry` unless its path is already present.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn insert_if_absent(&mut self, entry: ArchiveEntry) -> bool {
        self.insert_with_origin(entry, None)
    }

    fn insert_with_origin(&mut self, entry: ArchiveEntry, origin: Option<usize>) -> bool {
        if self.index.contains_key(entry.path()) {
            return false;
        }
        self.index.insert(entry.path().to_owned(), self.entries.len());
        self.entries.push(entry);
        self.origins.push(origin);
        true
    }

    /// Input archive that supplied the entry kept for `path`.
    ///
    /// Returns `None` for unknown paths and for entries inserted directly
    /// with [`MergeResult::insert_if_absent`].
    #[must_use]
    pub fn source_of(&self, path: &str) -> Option<&Utf8Path> {
        let pos = *self.index.get(path)?;
        let input = (*self.origins.get(pos)?)?;
        self.inputs.get(input).map(InputSummary::path)
    }

    /// Whether an entry with this relative path is present.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Entry stored under `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ArchiveEntry> {
        self.index.get(path).and_then(|&pos| self.entries.get(pos))
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the result holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Per-input statistics, in merge order.
    #[must_use]
    pub fn inputs(&self) -> &[InputSummary] {
        &self.inputs
    }

    /// Total duplicate entries skipped across all inputs.
    #[must_use]
    pub fn skipped_duplicates(&self) -> usize {
        self.inputs.iter().map(InputSummary::skipped).sum()
    }
}

/// Merge the archives at `inputs`, in order, into one entry collection.
///
/// An empty input list yields an empty result.
///
/// # Errors
///
/// Returns a [`MergeError`] if any input is missing, unreadable, corrupt,
/// or contains an entry path that escapes the archive root. The whole
/// merge fails; no partial result is returned.
pub fn merge<P: AsRef<Utf8Path>>(inputs: &[P]) -> Result<MergeResult, MergeError> {
    let mut result = MergeResult::default();
    for input in inputs {
        let position = result.inputs.len();
        let summary = import_archive(&mut result, input.as_ref(), position)?;
        debug!(
            "imported {} entries from {} ({} duplicates skipped)",
            summary.imported, summary.path, summary.skipped
        );
        result.inputs.push(summary);
    }
    info!(
        "merged {} archive(s) into {} entries ({} duplicates skipped)",
        inputs.len(),
        result.len(),
        result.skipped_duplicates()
    );
    Ok(result)
}

fn import_archive(
    result: &mut MergeResult,
    path: &Utf8Path,
    position: usize,
) -> Result<InputSummary, MergeError> {
    let file = File::open(path).map_err(|source| MergeError::Open {
        path: path.to_owned(),
        source,
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|source| MergeError::Corrupt {
        path: path.to_owned(),
        source,
    })?;
    let mut summary = InputSummary::new(path);

    for index in 0..archive.len() {
        let mut zip_entry = archive.by_index(index).map_err(|source| MergeError::Entry {
            path: path.to_owned(),
            index,
            source,
        })?;
        let name = zip_entry.name().to_owned();

        if zip_entry.enclosed_name().is_none() {
            return Err(MergeError::UnsafeEntryPath {
                path: path.to_owned(),
                entry: name,
            });
        }

        if result.contains(&name) {
            debug!("skipping duplicate {name} from {path}");
            summary.skipped += 1;
            continue;
        }

        let metadata = if zip_entry.is_dir() {
            EntryMetadata::directory(zip_entry.unix_mode())
        } else {
            EntryMetadata::file(zip_entry.compression(), zip_entry.unix_mode())
        };
        let mut content = Vec::new();
        zip_entry
            .read_to_end(&mut content)
            .map_err(|source| MergeError::Read {
                path: path.to_owned(),
                entry: name.clone(),
                source,
            })?;

        result.insert_with_origin(ArchiveEntry::new(name, content, metadata), Some(position));
        summary.imported += 1;
    }

    Ok(summary)
}
