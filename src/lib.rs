//! Index Card Joiner Library
//!
//! Finds folders of scanned index-card pages inside the active project folder,
//! merges each folder into a single PDF and copies the result to a secondary
//! location. This library provides functionality to:
//! - Locate the most recent project folder by prefix
//! - Scan a project tree for folders holding page PDFs
//! - Decide whether an existing merged output is stale
//! - Plan page order (plain concatenation or a fixed reorder table)
//! - Merge the planned pages with page labels and compression
//!
//! # Example
//!
//! ```no_run
//! use index_card_joiner::{Joiner, JoinerConfig};
//!
//! let config = JoinerConfig::from_home().expect("no home directory");
//! let summary = Joiner::new(config).run().expect("run failed");
//! println!("{} merged", summary.merged_count());
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod joiner;
pub mod pdf;
pub mod project;

// Re-export commonly used items
pub use config::JoinerConfig;
pub use error::{Error, Result};
pub use joiner::{FolderOutcome, Joiner, RunSummary};
