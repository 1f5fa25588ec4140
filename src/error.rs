//! Error taxonomy for the scan-and-search core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that cross the core boundary.
///
/// Traversal-level I/O failures never appear here: the walker logs and absorbs
/// them, degrading completeness (a partial inventory) rather than availability.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// The scan root does not exist or is not a directory.
    #[error("root path does not exist or is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// The search term is empty or whitespace-only.
    #[error("invalid search pattern: {0:?}")]
    InvalidPattern(String),

    /// No scan exists for the root; it must be indexed first.
    #[error("no index exists for {}; run `filescout index` first", .0.display())]
    NoSuchScan(PathBuf),

    /// A scan row already exists for the root. The orchestrator resolves this
    /// by deleting and retrying; it is never surfaced to a caller.
    #[error("an index already exists for {}", .0.display())]
    ScanExists(PathBuf),

    /// I/O failure outside traversal, e.g. creating the database directory.
    #[error("I/O error for path {}: {}", .1.display(), .0)]
    Io(#[source] std::io::Error, PathBuf),

    /// Underlying store failure.
    #[error("scan store error: {0}")]
    Store(#[from] rusqlite::Error),
}
