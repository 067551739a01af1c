//! Listing source files inside one folder

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::is_candidate_file_name;

/// List files directly in `folder` that end in `extension` and carry no ignore mask
///
/// Full paths are returned sorted by file name. This is the default merge order.
pub fn files_of_type_in_folder(
    folder: &Path,
    extension: &str,
    ignore_masks: &[String],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if is_candidate_file_name(&entry.file_name().to_string_lossy(), extension, ignore_masks) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}
