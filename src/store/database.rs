//! SQLite operations for the scan index.

use crate::error::ScoutError;
use crate::pattern::NameMatcher;
use crate::store::scan::{FileRecord, Scan};
use crate::walker::WalkResult;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA_VERSION: i32 = 1;

const INSERT_FILE_SQL: &str =
    "INSERT INTO files (scan_id, name, path, size, parent_path, extension)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const INSERT_FOLDER_SQL: &str = "INSERT INTO folders (scan_id, path) VALUES (?1, ?2)";

/// Scan index database, one inventory per indexed root.
pub struct ScanStore {
    db: Connection,
}

impl ScanStore {
    /// Open or create the store at the platform default location.
    pub fn open() -> Result<Self, ScoutError> {
        Self::open_at(&default_db_path())
    }

    /// Open or create the store at an explicit path.
    pub fn open_at(db_path: &Path) -> Result<Self, ScoutError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ScoutError::Io(e, parent.to_path_buf()))?;
            }
        }
        let db = Connection::open(db_path)?;

        // WAL keeps readers unblocked while a reindex transaction commits
        db.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(db)
    }

    /// Open a transient in-memory store.
    pub fn open_in_memory() -> Result<Self, ScoutError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self, ScoutError> {
        db.busy_timeout(Duration::from_secs(30))?;
        // Cascading deletes from scans to files/folders need this per connection
        db.pragma_update(None, "foreign_keys", "ON")?;

        let mut store = Self { db };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&mut self) -> Result<(), ScoutError> {
        let version: i32 = self
            .db
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .or_else(|_| {
                self.db.execute(
                    "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
                    [],
                )?;
                self.db
                    .execute("INSERT INTO schema_version (version) VALUES (0)", [])?;
                Ok::<i32, rusqlite::Error>(0)
            })?;

        if version < SCHEMA_VERSION {
            self.migrate_schema(version)?;
        }
        Ok(())
    }

    fn migrate_schema(&mut self, from_version: i32) -> Result<(), ScoutError> {
        let tx = self.db.transaction()?;

        if from_version == 0 {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS scans (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    root_path TEXT UNIQUE NOT NULL,
                    created_at INTEGER NOT NULL,
                    total_folders INTEGER NOT NULL DEFAULT 0,
                    total_files INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS files (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    scan_id INTEGER NOT NULL REFERENCES scans(id) ON DELETE CASCADE,
                    name TEXT NOT NULL,
                    path TEXT NOT NULL,
                    size INTEGER NOT NULL,
                    parent_path TEXT NOT NULL,
                    extension TEXT
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS folders (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    scan_id INTEGER NOT NULL REFERENCES scans(id) ON DELETE CASCADE,
                    path TEXT NOT NULL
                )",
                [],
            )?;

            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_files_scan_id ON files(scan_id)",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_files_name ON files(name)",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_files_parent_path ON files(parent_path)",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_folders_scan_id ON folders(scan_id)",
                [],
            )?;

            tx.execute("UPDATE schema_version SET version = ?1", [SCHEMA_VERSION])?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Create a scan row for `root_path` with zeroed totals.
    pub fn create_scan(&self, root_path: &str) -> Result<i64, ScoutError> {
        self.db
            .execute(
                "INSERT INTO scans (root_path, created_at) VALUES (?1, ?2)",
                params![root_path, Utc::now().timestamp()],
            )
            .map_err(|e| map_scan_exists(e, root_path))?;
        Ok(self.db.last_insert_rowid())
    }

    /// Delete a scan; its files and folders cascade with it.
    pub fn delete_scan(&self, scan_id: i64) -> Result<(), ScoutError> {
        self.db
            .execute("DELETE FROM scans WHERE id = ?1", [scan_id])?;
        Ok(())
    }

    pub fn insert_file(
        &self,
        scan_id: i64,
        name: &str,
        path: &str,
        size: u64,
        parent_path: &str,
        extension: Option<&str>,
    ) -> Result<(), ScoutError> {
        self.db.execute(
            INSERT_FILE_SQL,
            params![scan_id, name, path, clamp_size(size), parent_path, extension],
        )?;
        Ok(())
    }

    pub fn insert_folder(&self, scan_id: i64, path: &str) -> Result<(), ScoutError> {
        self.db.execute(INSERT_FOLDER_SQL, params![scan_id, path])?;
        Ok(())
    }

    pub fn update_scan_totals(
        &self,
        scan_id: i64,
        total_folders: u64,
        total_files: u64,
    ) -> Result<(), ScoutError> {
        self.db.execute(
            "UPDATE scans SET total_folders = ?1, total_files = ?2 WHERE id = ?3",
            params![total_folders as i64, total_files as i64, scan_id],
        )?;
        Ok(())
    }

    pub fn find_scan_by_root(&self, root_path: &str) -> Result<Option<Scan>, ScoutError> {
        let scan = self
            .db
            .query_row(
                "SELECT id, root_path, created_at, total_folders, total_files
                 FROM scans WHERE root_path = ?1",
                [root_path],
                scan_from_row,
            )
            .optional()?;
        Ok(scan)
    }

    /// Every stored scan, ordered by root path.
    pub fn list_scans(&self) -> Result<Vec<Scan>, ScoutError> {
        let mut stmt = self.db.prepare(
            "SELECT id, root_path, created_at, total_folders, total_files
             FROM scans ORDER BY root_path",
        )?;
        let rows = stmt.query_map([], scan_from_row)?;

        let mut scans = Vec::new();
        for row in rows {
            scans.push(row?);
        }
        Ok(scans)
    }

    /// Every file of the scan whose name satisfies `matcher`, ordered by
    /// (parent_path, name) so aggregation output is reproducible.
    pub fn query_matching_files(
        &self,
        scan_id: i64,
        matcher: &NameMatcher,
    ) -> Result<Vec<FileRecord>, ScoutError> {
        let mut stmt = self.db.prepare(
            "SELECT scan_id, name, path, size, parent_path, extension
             FROM files WHERE scan_id = ?1 ORDER BY parent_path, name",
        )?;
        let rows = stmt.query_map([scan_id], file_from_row)?;

        let mut files = Vec::new();
        for row in rows {
            let file = row?;
            if matcher.is_match(&file.name) {
                files.push(file);
            }
        }
        Ok(files)
    }

    /// Every folder path of the scan, ordered by path.
    pub fn list_folders(&self, scan_id: i64) -> Result<Vec<String>, ScoutError> {
        let mut stmt = self
            .db
            .prepare("SELECT path FROM folders WHERE scan_id = ?1 ORDER BY path")?;
        let rows = stmt.query_map([scan_id], |row| row.get::<_, String>(0))?;

        let mut folders = Vec::new();
        for row in rows {
            folders.push(row?);
        }
        Ok(folders)
    }

    /// Atomically replace any existing scan of `root_path` with the walked
    /// inventory: delete, recreate, populate, and set totals in one
    /// transaction, so readers observe either the old inventory or the new
    /// one, never a mix.
    pub fn replace_scan(
        &mut self,
        root_path: &str,
        inventory: &WalkResult,
    ) -> Result<Scan, ScoutError> {
        let created_at = Utc::now().timestamp();
        let tx = self.db.transaction()?;

        tx.execute("DELETE FROM scans WHERE root_path = ?1", [root_path])?;
        tx.execute(
            "INSERT INTO scans (root_path, created_at) VALUES (?1, ?2)",
            params![root_path, created_at],
        )
        .map_err(|e| map_scan_exists(e, root_path))?;
        let scan_id = tx.last_insert_rowid();

        {
            let mut file_stmt = tx.prepare(INSERT_FILE_SQL)?;
            for file in &inventory.files {
                let path = file.path.to_string_lossy();
                let parent = file.parent.to_string_lossy();
                file_stmt.execute(params![
                    scan_id,
                    file.name,
                    &*path,
                    clamp_size(file.size),
                    &*parent,
                    file.extension,
                ])?;
            }

            let mut folder_stmt = tx.prepare(INSERT_FOLDER_SQL)?;
            for folder in &inventory.folders {
                let path = folder.to_string_lossy();
                folder_stmt.execute(params![scan_id, &*path])?;
            }
        }

        let total_folders = inventory.folders.len() as u64;
        let total_files = inventory.files.len() as u64;
        tx.execute(
            "UPDATE scans SET total_folders = ?1, total_files = ?2 WHERE id = ?3",
            params![total_folders as i64, total_files as i64, scan_id],
        )?;

        tx.commit()?;

        Ok(Scan {
            id: scan_id,
            root_path: root_path.to_string(),
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_else(Utc::now),
            total_folders,
            total_files,
        })
    }
}

/// Platform data directory for the index database.
fn default_db_path() -> PathBuf {
    ProjectDirs::from("", "", "filescout")
        .map(|dirs| dirs.data_dir().join("index.db"))
        .unwrap_or_else(|| PathBuf::from("filescout.db"))
}

/// SQLite INTEGER is signed 64-bit; sizes past that are capped.
fn clamp_size(size: u64) -> i64 {
    if size > i64::MAX as u64 {
        i64::MAX
    } else {
        size as i64
    }
}

fn map_scan_exists(err: rusqlite::Error, root_path: &str) -> ScoutError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            ScoutError::ScanExists(PathBuf::from(root_path))
        }
        _ => ScoutError::Store(err),
    }
}

fn scan_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Scan> {
    let created_at: i64 = row.get(2)?;
    Ok(Scan {
        id: row.get(0)?,
        root_path: row.get(1)?,
        created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_else(Utc::now),
        total_folders: row.get::<_, i64>(3)? as u64,
        total_files: row.get::<_, i64>(4)? as u64,
    })
}

fn file_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        scan_id: row.get(0)?,
        name: row.get(1)?,
        path: row.get(2)?,
        size: row.get::<_, i64>(3)?.max(0) as u64,
        parent_path: row.get(4)?,
        extension: row.get(5)?,
    })
}
