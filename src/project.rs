//! Project identity and merged output naming

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The active project folder and the identifier embedded in its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Full path of the project folder
    pub folder: PathBuf,
    /// Folder name, used for the secondary copy location
    pub name: String,
    /// First `<prefix><digits>` run in the folder name, e.g. `UNQ0450`
    pub identifier: String,
}

impl Project {
    /// Build a project from its folder, extracting the identifier
    pub fn from_folder(folder: &Path, prefix: &str) -> Result<Self> {
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let identifier =
            find_identifier(&name, prefix).ok_or_else(|| Error::IdentifierNotFound {
                folder: folder.to_path_buf(),
                prefix: prefix.to_string(),
            })?;

        Ok(Self {
            folder: folder.to_path_buf(),
            name,
            identifier,
        })
    }

    /// True if a name carries this project's identifier
    pub fn is_marked(&self, name: &str) -> bool {
        name.contains(&self.identifier)
    }
}

/// Find the first occurrence of `prefix` followed by one or more ASCII digits
pub fn find_identifier(name: &str, prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    for (start, _) in name.match_indices(prefix) {
        let rest = &name[start + prefix.len()..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            return Some(name[start..start + prefix.len() + digits].to_string());
        }
    }
    None
}

/// Merged output file name for a source folder: `<folder>_<parent>.pdf`
///
/// Spaces in the parent name become underscores; the folder name is kept as is.
pub fn output_name(source_folder: &Path) -> String {
    let leaf = source_folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = source_folder
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().replace(' ', "_"))
        .unwrap_or_default();

    format!("{leaf}_{parent}.pdf")
}
