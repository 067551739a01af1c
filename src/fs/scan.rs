//! Recursive search for folders holding source files

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::fs::{files_of_type_in_folder, matches_ignore_mask};

/// Find every folder under `root` that directly contains a qualifying file
///
/// A folder qualifies when it holds at least one regular file ending in
/// `extension` whose name carries no ignore mask, and its own path below
/// `root` carries no ignore mask either. Only the part of the path below
/// `root` is checked, so a mask word in `root` or its ancestors excludes
/// nothing. Masked folders are pruned, so nothing beneath them is reported.
/// `root` itself is a candidate.
///
/// Folders are returned depth-first with siblings in name order.
pub fn subfolders_with_files_of_type(
    root: &Path,
    extension: &str,
    ignore_masks: &[String],
) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_masked_dir(root, entry, ignore_masks));

    let mut folders = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if !files_of_type_in_folder(entry.path(), extension, ignore_masks)?.is_empty() {
            tracing::trace!(folder = %entry.path().display(), "found source folder");
            folders.push(entry.into_path());
        }
    }

    Ok(folders)
}

fn is_masked_dir(root: &Path, entry: &DirEntry, ignore_masks: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    matches_ignore_mask(&relative.to_string_lossy(), ignore_masks)
}
