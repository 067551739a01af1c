//! Error types for the index card joiner

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the index card joiner
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("Failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// No folder under the root starts with the project prefix
    #[error("No project folder starting with {prefix:?} found in {}", .root.display())]
    ProjectFolderNotFound { root: PathBuf, prefix: String },

    /// The project folder name does not carry `<prefix><digits>`
    #[error("Project folder {} has no identifier of the form {prefix}<digits>", .folder.display())]
    IdentifierNotFound { folder: PathBuf, prefix: String },

    /// `~` was used but the home directory could not be determined
    #[error("Could not determine the home directory")]
    HomeDirectoryUnavailable,

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// A merge was requested with an empty plan
    #[error("Nothing to merge into {}", .0.display())]
    NothingToMerge(PathBuf),

    /// A reorder table entry names a file index with no matching source
    #[error("Reorder table entry {index:02} has no matching source file ({ordering})")]
    ReorderSourceMissing { ordering: String, index: u32 },

    /// A single-page selection points past the end of its source
    #[error("Page {page} requested from {} which has {count} pages", .path.display())]
    PageOutOfRange {
        path: PathBuf,
        page: u32,
        count: usize,
    },
}
