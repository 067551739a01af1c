//! Project folder lookup

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::Result;

/// Find the most recently created directory in `parent` whose name starts with `prefix`
///
/// Only immediate children are considered. Returns `None` when no directory
/// matches. Ties keep the first directory seen in name order.
///
/// Creation time is not available everywhere (older Linux kernels and some
/// network filesystems report none). When it is missing the last-modified
/// time of the directory is used instead.
pub fn most_recent_folder_with_prefix(parent: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(prefix) {
            candidates.push(entry.path());
        }
    }
    candidates.sort();

    let mut most_recent: Option<(SystemTime, PathBuf)> = None;
    for path in candidates {
        let created = creation_time(&path)?;
        tracing::trace!(folder = %path.display(), ?created, "project folder candidate");
        match &most_recent {
            Some((time, _)) if created <= *time => {}
            _ => most_recent = Some((created, path)),
        }
    }

    Ok(most_recent.map(|(_, path)| path))
}

/// Creation time of a path, falling back to its modification time
pub fn creation_time(path: &Path) -> Result<SystemTime> {
    let metadata = fs::metadata(path)?;
    match metadata.created() {
        Ok(time) => Ok(time),
        Err(_) => Ok(metadata.modified()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_picks_latest_matching_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::create_dir(root.join("UNQ0100 Old project")).unwrap();
        sleep(Duration::from_millis(50));
        fs::create_dir(root.join("UNQ0200 New project")).unwrap();
        sleep(Duration::from_millis(50));
        // Newer, but wrong prefix
        fs::create_dir(root.join("Archive")).unwrap();

        let found = most_recent_folder_with_prefix(root, "UNQ").unwrap();
        assert_eq!(found, Some(root.join("UNQ0200 New project")));
    }

    #[test]
    fn test_ignores_files_with_prefix() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::create_dir(root.join("UNQ0100")).unwrap();
        sleep(Duration::from_millis(50));
        fs::write(root.join("UNQ0999.txt"), b"not a folder").unwrap();

        let found = most_recent_folder_with_prefix(root, "UNQ").unwrap();
        assert_eq!(found, Some(root.join("UNQ0100")));
    }

    #[test]
    fn test_no_match_returns_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("Something else")).unwrap();

        let found = most_recent_folder_with_prefix(temp_dir.path(), "UNQ").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_missing_parent_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = most_recent_folder_with_prefix(&temp_dir.path().join("absent"), "UNQ");
        assert!(result.is_err());
    }
}
