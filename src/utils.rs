//! Small path helpers shared across the crate.

use std::path::Path;

/// True for entry names the indexer treats as hidden (dot-prefixed).
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Normalize a path for display (strip Windows long-path prefixes).
pub fn display_path(path: &Path) -> String {
    let path_str = path.to_string_lossy().to_string();
    #[cfg(windows)]
    {
        if let Some(stripped) = path_str.strip_prefix(r"\\?\UNC\") {
            return format!(r"\\{}", stripped);
        }
        if let Some(stripped) = path_str.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }
    path_str
}
