//! Search aggregation over a stored scan inventory.

use crate::error::ScoutError;
use crate::pattern::{self, MatchMode};
use crate::store::{FileRecord, ScanStore};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// One matched file inside a folder bucket.
#[derive(Debug, Clone, Serialize)]
pub struct FoundFile {
    pub name: String,
    pub size: u64,
    pub path: String,
}

/// One folder, bucketed by whether it holds a match.
#[derive(Debug, Clone, Serialize)]
pub struct FolderResult {
    pub folder_path: String,
    pub has_file: bool,
    pub found_files: Vec<FoundFile>,
    /// Depth relative to the scan root (the root itself is 0).
    pub depth: usize,
}

/// Two-sided search outcome with summary counts.
#[derive(Debug, Clone, Serialize)]
pub struct SearchStats {
    pub total_folders_scanned: usize,
    pub total_folders_with_file: usize,
    pub total_folders_without_file: usize,
    pub total_files_found: usize,
    pub folders_with_file: Vec<FolderResult>,
    pub folders_without_file: Vec<FolderResult>,
}

/// Knobs for a search: anchoring mode and an optional extension filter.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub mode: MatchMode,
    /// Restrict matches to this extension (lower-cased, leading dot ignored).
    pub extension: Option<String>,
}

/// Search `root`'s stored inventory with the default whole-name anchoring.
pub fn search(store: &ScanStore, root: &Path, term: &str) -> Result<SearchStats, ScoutError> {
    search_with_options(store, root, term, &SearchOptions::default())
}

/// Search `root`'s stored inventory for folders containing a file matching
/// `term`.
///
/// Fails with `NoSuchScan` when the root was never indexed. Every folder the
/// scan recorded lands in exactly one of the two buckets; matched folders
/// arrive ordered by path with their files ordered by name.
pub fn search_with_options(
    store: &ScanStore,
    root: &Path,
    term: &str,
    options: &SearchOptions,
) -> Result<SearchStats, ScoutError> {
    let matcher = pattern::compile_with_mode(term, options.mode)?;

    let key = lookup_key(root);
    let scan = store
        .find_scan_by_root(&key)?
        .ok_or_else(|| ScoutError::NoSuchScan(root.to_path_buf()))?;

    let mut matches = store.query_matching_files(scan.id, &matcher)?;
    if let Some(ext) = &options.extension {
        let ext = ext.trim_start_matches('.').to_lowercase();
        matches.retain(|file| file.extension.as_deref() == Some(ext.as_str()));
    }
    let folders = store.list_folders(scan.id)?;

    Ok(aggregate(&scan.root_path, matches, folders))
}

/// Roots are stored canonicalized; fall back to the given path when
/// canonicalization fails (e.g. the directory was deleted after indexing).
fn lookup_key(root: &Path) -> String {
    root.canonicalize()
        .unwrap_or_else(|_| root.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

fn aggregate(root_path: &str, matches: Vec<FileRecord>, folders: Vec<String>) -> SearchStats {
    // Rows arrive ordered by (parent_path, name), so grouping is a single pass
    let mut with_file: Vec<FolderResult> = Vec::new();
    for file in matches {
        let FileRecord {
            name,
            path,
            size,
            parent_path,
            ..
        } = file;
        let found = FoundFile { name, size, path };
        let needs_new_bucket = with_file
            .last()
            .map_or(true, |bucket| bucket.folder_path != parent_path);
        if needs_new_bucket {
            with_file.push(FolderResult {
                depth: depth_below(root_path, &parent_path),
                folder_path: parent_path,
                has_file: true,
                found_files: Vec::new(),
            });
        }
        if let Some(bucket) = with_file.last_mut() {
            bucket.found_files.push(found);
        }
    }

    let matched: HashSet<&str> = with_file.iter().map(|f| f.folder_path.as_str()).collect();
    let without_file: Vec<FolderResult> = folders
        .iter()
        .filter(|path| !matched.contains(path.as_str()))
        .map(|path| FolderResult {
            folder_path: path.clone(),
            has_file: false,
            found_files: Vec::new(),
            depth: depth_below(root_path, path),
        })
        .collect();

    let total_files_found = with_file.iter().map(|f| f.found_files.len()).sum();
    SearchStats {
        total_folders_scanned: folders.len(),
        total_folders_with_file: with_file.len(),
        total_folders_without_file: without_file.len(),
        total_files_found,
        folders_with_file: with_file,
        folders_without_file: without_file,
    }
}

fn depth_below(root: &str, folder: &str) -> usize {
    Path::new(folder)
        .strip_prefix(root)
        .map(|rel| rel.components().count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index;
    use std::fs;
    use tempfile::TempDir;

    fn build_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join("a/x.pdf"), b"pdf").unwrap();
        fs::write(dir.path().join("b/y.txt"), b"txt").unwrap();
        fs::write(dir.path().join(".hidden/z.pdf"), b"pdf").unwrap();
        dir
    }

    fn indexed_store(dir: &TempDir) -> ScanStore {
        let mut store = ScanStore::open_in_memory().unwrap();
        index::reindex(&mut store, dir.path()).unwrap();
        store
    }

    #[test]
    fn partitions_folders_into_two_buckets() {
        let dir = build_tree();
        let store = indexed_store(&dir);

        let stats = search(&store, dir.path(), "*pdf*").unwrap();

        assert_eq!(stats.total_folders_scanned, 3);
        assert_eq!(stats.total_folders_with_file, 1);
        assert_eq!(stats.total_folders_without_file, 2);
        assert_eq!(stats.total_files_found, 1);

        let hit = &stats.folders_with_file[0];
        assert!(hit.has_file);
        assert!(hit.folder_path.ends_with("/a") || hit.folder_path.ends_with("a"));
        assert_eq!(hit.found_files.len(), 1);
        assert_eq!(hit.found_files[0].name, "x.pdf");
        assert_eq!(hit.found_files[0].size, 3);

        assert!(stats
            .folders_without_file
            .iter()
            .all(|f| !f.has_file && f.found_files.is_empty()));
    }

    #[test]
    fn every_folder_lands_in_exactly_one_bucket() {
        let dir = build_tree();
        let store = indexed_store(&dir);

        let stats = search(&store, dir.path(), "*pdf*").unwrap();
        let root = index::canonical_root(dir.path()).unwrap();
        let scan = store
            .find_scan_by_root(&root.to_string_lossy())
            .unwrap()
            .unwrap();

        let mut bucketed: Vec<&str> = stats
            .folders_with_file
            .iter()
            .chain(stats.folders_without_file.iter())
            .map(|f| f.folder_path.as_str())
            .collect();
        bucketed.sort_unstable();

        let folders = store.list_folders(scan.id).unwrap();
        let mut expected: Vec<&str> = folders.iter().map(|s| s.as_str()).collect();
        expected.sort_unstable();

        assert_eq!(bucketed, expected);
        assert_eq!(
            stats.total_folders_scanned,
            stats.total_folders_with_file + stats.total_folders_without_file
        );
    }

    #[test]
    fn totals_agree_with_bucket_contents() {
        let dir = build_tree();
        fs::write(dir.path().join("a/second.pdf"), b"pdfpdf").unwrap();
        fs::write(dir.path().join("b/third.pdf"), b"p").unwrap();
        let store = indexed_store(&dir);

        let stats = search(&store, dir.path(), "*.pdf").unwrap();
        let summed: usize = stats
            .folders_with_file
            .iter()
            .map(|f| f.found_files.len())
            .sum();
        assert_eq!(stats.total_files_found, summed);
        assert_eq!(stats.total_files_found, 3);
        assert_eq!(stats.total_folders_with_file, 2);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("REPORT.PDF"), b"x").unwrap();
        let store = indexed_store(&dir);

        let anchored = search(&store, dir.path(), "*report*").unwrap();
        assert_eq!(anchored.total_files_found, 1);

        let options = SearchOptions {
            mode: MatchMode::Substring,
            extension: None,
        };
        let substring =
            search_with_options(&store, dir.path(), "report", &options).unwrap();
        assert_eq!(substring.total_files_found, 1);
        assert_eq!(substring.folders_with_file[0].found_files[0].name, "REPORT.PDF");
    }

    #[test]
    fn whole_name_anchoring_is_the_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("report.pdf"), b"x").unwrap();
        let store = indexed_store(&dir);

        let stats = search(&store, dir.path(), "report").unwrap();
        assert_eq!(stats.total_files_found, 0);

        let stats = search(&store, dir.path(), "report.pdf").unwrap();
        assert_eq!(stats.total_files_found, 1);
    }

    #[test]
    fn hidden_folders_never_surface_in_results() {
        let dir = build_tree();
        let store = indexed_store(&dir);

        let stats = search(&store, dir.path(), "*").unwrap();
        assert!(stats
            .folders_with_file
            .iter()
            .chain(stats.folders_without_file.iter())
            .all(|f| !f.folder_path.contains(".hidden")));
    }

    #[test]
    fn unindexed_root_is_no_such_scan() {
        let dir = build_tree();
        let store = ScanStore::open_in_memory().unwrap();

        let err = search(&store, dir.path(), "*pdf*").unwrap_err();
        assert!(matches!(err, ScoutError::NoSuchScan(_)));
    }

    #[test]
    fn blank_term_is_invalid_pattern() {
        let dir = build_tree();
        let store = indexed_store(&dir);

        let err = search(&store, dir.path(), "  ").unwrap_err();
        assert!(matches!(err, ScoutError::InvalidPattern(_)));
    }

    #[test]
    fn extension_filter_narrows_matches() {
        let dir = build_tree();
        let store = indexed_store(&dir);

        let options = SearchOptions {
            mode: MatchMode::WholeName,
            extension: Some(".PDF".to_string()),
        };
        let stats = search_with_options(&store, dir.path(), "*", &options).unwrap();
        assert_eq!(stats.total_files_found, 1);
        assert_eq!(stats.folders_with_file[0].found_files[0].name, "x.pdf");
    }

    #[test]
    fn depth_is_relative_to_the_root() {
        let dir = build_tree();
        fs::create_dir(dir.path().join("a/deep")).unwrap();
        fs::write(dir.path().join("a/deep/far.pdf"), b"x").unwrap();
        let store = indexed_store(&dir);

        let stats = search(&store, dir.path(), "*").unwrap();
        let all: Vec<&FolderResult> = stats
            .folders_with_file
            .iter()
            .chain(stats.folders_without_file.iter())
            .collect();

        let root = index::canonical_root(dir.path()).unwrap();
        let root_str = root.to_string_lossy();
        let root_bucket = all.iter().find(|f| f.folder_path == root_str).unwrap();
        assert_eq!(root_bucket.depth, 0);

        let deep = all
            .iter()
            .find(|f| f.folder_path.ends_with("deep"))
            .unwrap();
        assert_eq!(deep.depth, 2);
    }

    #[test]
    fn matched_files_are_ordered_by_folder_then_name() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("b/z.pdf"), b"x").unwrap();
        fs::write(dir.path().join("b/a.pdf"), b"x").unwrap();
        fs::write(dir.path().join("a/m.pdf"), b"x").unwrap();
        let store = indexed_store(&dir);

        let stats = search(&store, dir.path(), "*.pdf").unwrap();
        assert_eq!(stats.folders_with_file.len(), 2);
        assert!(stats.folders_with_file[0].folder_path < stats.folders_with_file[1].folder_path);

        let b_bucket = &stats.folders_with_file[1];
        let names: Vec<&str> = b_bucket.found_files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "z.pdf"]);
    }
}
