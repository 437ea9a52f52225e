//! Test support utilities for universal-jar behavioural tests.
//!
//! Helpers for writing module archives into a temporary project and reading
//! back the published archive.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::io::{Read, Write};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// A temporary project directory.
pub struct Project {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Project {
    /// Create an empty project in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 temp dir");
        Self { _dir: dir, root }
    }

    /// Project root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write a zip archive at `relative` holding `entries`.
    pub fn write_archive(&self, relative: &str, entries: &[(String, Vec<u8>)]) -> Utf8PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create archive directory");
        }
        let mut writer = ZipWriter::new(File::create(&path).expect("create archive"));
        for (name, content) in entries {
            writer
                .start_file(name.as_str(), SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(content).expect("write entry");
        }
        writer.finish().expect("finish archive");
        path
    }

    /// Write `universal.toml` at the project root.
    pub fn write_config(&self, text: &str) {
        std::fs::write(self.root.join("universal.toml"), text).expect("write configuration");
    }
}

/// Read every entry of the archive at `path` as `(name, bytes)` pairs.
pub fn read_entries(path: &Utf8Path) -> Vec<(String, Vec<u8>)> {
    let file = File::open(path).expect("open archive");
    let mut archive = ZipArchive::new(file).expect("valid zip archive");
    (0..archive.len())
        .map(|index| {
            let mut entry = archive.by_index(index).expect("read entry");
            let mut content = Vec::new();
            entry.read_to_end(&mut content).expect("read entry bytes");
            (entry.name().to_owned(), content)
        })
        .collect()
}
