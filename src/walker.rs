//! Recursive directory traversal that builds a scan inventory.

use crate::error::ScoutError;
use crate::utils;
use std::fs;
use std::path::{Path, PathBuf};

/// One regular file discovered during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub parent: PathBuf,
    /// Lower-cased extension; `None` for extension-less names.
    pub extension: Option<String>,
}

/// Inventory produced by [`walk`]: every indexed file plus every directory
/// that was successfully opened.
#[derive(Debug, Default)]
pub struct WalkResult {
    pub files: Vec<FileEntry>,
    pub folders: Vec<PathBuf>,
}

/// What a directory entry turned out to be once classified.
enum EntryKind {
    File,
    Directory,
    Unreadable,
}

/// Walk `root` depth-first and collect the inventory.
///
/// A subdirectory is fully walked before its next sibling begins; sibling
/// order is whatever the directory listing yields. Hidden entries (dot-prefixed
/// names) are excluded uniformly, and symlinks are opaque: never followed,
/// never recorded. Unreadable entries and unopenable subdirectories are logged
/// and omitted; the walk itself only fails when `root` is missing or not a
/// directory.
pub fn walk(root: &Path) -> Result<WalkResult, ScoutError> {
    let meta =
        fs::metadata(root).map_err(|_| ScoutError::InvalidRoot(root.to_path_buf()))?;
    if !meta.is_dir() {
        return Err(ScoutError::InvalidRoot(root.to_path_buf()));
    }

    let mut result = WalkResult::default();
    scan_dir(root, &mut result);
    Ok(result)
}

fn scan_dir(dir: &Path, out: &mut WalkResult) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };
    out.folders.push(dir.to_path_buf());

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("cannot read entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if utils::is_hidden_name(&name) {
            continue;
        }

        let kind = match entry.file_type() {
            Ok(ft) if ft.is_symlink() => {
                log::debug!("skipping symlink {}", entry.path().display());
                continue;
            }
            Ok(ft) if ft.is_file() => EntryKind::File,
            Ok(ft) if ft.is_dir() => EntryKind::Directory,
            _ => EntryKind::Unreadable,
        };

        match kind {
            EntryKind::File => match entry.metadata() {
                Ok(meta) => {
                    let path = entry.path();
                    out.files.push(FileEntry {
                        extension: extension_of(&path),
                        name,
                        path,
                        size: meta.len(),
                        parent: dir.to_path_buf(),
                    });
                }
                Err(e) => {
                    log::warn!("cannot stat {}: {}", entry.path().display(), e);
                }
            },
            EntryKind::Directory => scan_dir(&entry.path(), out),
            EntryKind::Unreadable => {
                log::warn!("cannot classify {}", entry.path().display());
            }
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
