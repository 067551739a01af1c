//! Run configuration
//!
//! Everything a run needs is carried in a [`JoinerConfig`] value handed to
//! the [`Joiner`](crate::Joiner). The defaults describe the shared index card
//! drive; the CLI overrides individual fields.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pdf::OrderingRegistry;

/// Folder holding the project folders
pub const DEFAULT_ROOT: &str = "~/Google Drive/Shared drives/BBG - Index cards";

/// Where copies of merged outputs are collected
pub const DEFAULT_SECONDARY_TARGET: &str = "~/Desktop/Joined_PDFs";

/// Project folder names start with this and carry it followed by digits
pub const DEFAULT_PREFIX: &str = "UNQ";

/// Source file extension
pub const DEFAULT_EXTENSION: &str = ".pdf";

/// Files and folders whose names contain any of these are skipped
pub const DEFAULT_IGNORE_MASKS: [&str; 2] = ["OLD", "DNU"];

/// Configuration for one run
#[derive(Debug)]
pub struct JoinerConfig {
    /// Folder searched for the most recent project folder
    pub root: PathBuf,
    /// Use this project folder instead of searching `root`
    pub project: Option<PathBuf>,
    /// Project folder prefix, also the start of the project identifier
    pub prefix: String,
    /// Copies of merged outputs go to `<secondary_target>/<project name>/`
    pub secondary_target: PathBuf,
    /// Source file extension, including the dot
    pub extension: String,
    /// Name substrings that exclude files and folders
    pub ignore_masks: Vec<String>,
    /// Rebuild outputs even when they are up to date
    pub force: bool,
    /// Report decisions without writing anything
    pub dry_run: bool,
    /// Page orderings consulted for every folder
    pub orderings: OrderingRegistry,
}

impl JoinerConfig {
    /// Configuration with default settings for the given locations
    pub fn new(root: impl Into<PathBuf>, secondary_target: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            project: None,
            prefix: DEFAULT_PREFIX.to_string(),
            secondary_target: secondary_target.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            ignore_masks: DEFAULT_IGNORE_MASKS.iter().map(|m| m.to_string()).collect(),
            force: false,
            dry_run: false,
            orderings: OrderingRegistry::default(),
        }
    }

    /// Default configuration with `~` resolved against the home directory
    pub fn from_home() -> Result<Self> {
        Ok(Self::new(
            expand_home(DEFAULT_ROOT)?,
            expand_home(DEFAULT_SECONDARY_TARGET)?,
        ))
    }
}

/// Expand a leading `~` to the current user's home directory
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return dirs::home_dir().ok_or(Error::HomeDirectoryUnavailable);
    }
    match path.strip_prefix("~/") {
        Some(rest) => Ok(dirs::home_dir()
            .ok_or(Error::HomeDirectoryUnavailable)?
            .join(rest)),
        None => Ok(Path::new(path).to_path_buf()),
    }
}
