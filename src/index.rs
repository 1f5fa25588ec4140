//! Reindex orchestration: replace-on-rescan semantics per root.

use crate::error::ScoutError;
use crate::store::ScanStore;
use crate::walker;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

lazy_static! {
    // One lock per canonical root; concurrent reindexes of the same root
    // serialize, different roots do not contend.
    static ref REINDEX_LOCKS: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>> =
        Mutex::new(HashMap::new());
}

fn root_lock(root: &Path) -> Arc<Mutex<()>> {
    let mut locks = REINDEX_LOCKS.lock().unwrap();
    locks.entry(root.to_path_buf()).or_default().clone()
}

/// Identity and totals of a freshly committed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ReindexSummary {
    pub scan_id: i64,
    pub total_folders: u64,
    pub total_files: u64,
}

/// Rebuild the index for `root`, superseding any previous scan of it.
///
/// The walk runs before the store is touched, and the old inventory is swapped
/// for the new one in a single transaction, so a failure at any point leaves
/// the previous scan intact. Never commits a partial scan.
pub fn reindex(store: &mut ScanStore, root: &Path) -> Result<ReindexSummary, ScoutError> {
    let root = canonical_root(root)?;
    let lock = root_lock(&root);
    let _guard = lock.lock().unwrap();

    let inventory = walker::walk(&root)?;
    log::debug!(
        "walked {}: {} files in {} folders",
        root.display(),
        inventory.files.len(),
        inventory.folders.len()
    );

    let root_str = root.to_string_lossy();
    let scan = match store.replace_scan(&root_str, &inventory) {
        Err(ScoutError::ScanExists(_)) => {
            if let Some(existing) = store.find_scan_by_root(&root_str)? {
                store.delete_scan(existing.id)?;
            }
            store.replace_scan(&root_str, &inventory)?
        }
        other => other?,
    };

    Ok(ReindexSummary {
        scan_id: scan.id,
        total_folders: scan.total_folders,
        total_files: scan.total_files,
    })
}

/// Canonicalize `root`, rejecting paths that are missing or not directories.
pub fn canonical_root(root: &Path) -> Result<PathBuf, ScoutError> {
    let canonical = root
        .canonicalize()
        .map_err(|_| ScoutError::InvalidRoot(root.to_path_buf()))?;
    if !canonical.is_dir() {
        return Err(ScoutError::InvalidRoot(root.to_path_buf()));
    }
    Ok(canonical)
}
