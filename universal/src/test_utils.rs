//! Shared test utilities for the universal-jar crate.

use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use std::fs::File;
use std::io::{Read, Write};
use std::process::{ExitStatus, Output};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// A temporary directory with helpers for writing module archives.
pub struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    /// Root of the temporary directory.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path for `relative` under the root, without creating it.
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Write raw bytes to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, content: &[u8]) -> Utf8PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directory");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Write a deflated zip archive with `0o644` entries.
    pub fn zip(&self, relative: &str, entries: &[(&str, &[u8])]) -> Utf8PathBuf {
        let with_modes: Vec<(&str, &[u8], u32)> = entries
            .iter()
            .map(|&(name, content)| (name, content, 0o644))
            .collect();
        self.zip_with_modes(relative, &with_modes)
    }

    /// Write a deflated zip archive with explicit unix modes per entry.
    pub fn zip_with_modes(&self, relative: &str, entries: &[(&str, &[u8], u32)]) -> Utf8PathBuf {
        let path = self.file(relative, b"");
        let file = File::create(&path).expect("create archive");
        let mut writer = ZipWriter::new(file);
        for &(name, content, mode) in entries {
            let options = SimpleFileOptions::default().unix_permissions(mode);
            writer.start_file(name, options).expect("start entry");
            writer.write_all(content).expect("write entry");
        }
        writer.finish().expect("finish archive");
        path
    }
}

/// Provides a fresh temporary workspace.
#[fixture]
pub fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 temp dir");
    Workspace { _dir: dir, root }
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

/// Unix mode recorded for `name` in the archive at `path`.
pub fn entry_mode(path: &Utf8Path, name: &str) -> Option<u32> {
    let file = File::open(path).expect("open archive");
    let mut archive = ZipArchive::new(file).expect("valid zip archive");
    let entry = archive.by_name(name).expect("entry present");
    entry.unix_mode()
}
