//! Row types for the scan store.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One point-in-time inventory of a root path.
///
/// At most one scan exists per root; reindexing replaces the row and every
/// file/folder record owned by it.
#[derive(Debug, Clone, Serialize)]
pub struct Scan {
    pub id: i64,
    pub root_path: String,
    pub created_at: DateTime<Utc>,
    pub total_folders: u64,
    pub total_files: u64,
}

/// One indexed file, owned exclusively by its scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub scan_id: i64,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub parent_path: String,
    /// Lower-cased extension; `None` for extension-less names.
    pub extension: Option<String>,
}
