//! Page ordering strategies
//!
//! A strategy turns the sorted source files of one folder into a merge plan:
//! an ordered list of (source file, page selection) steps. Most folders are
//! plain concatenations. Card sets whose scans come out of order get a
//! [`TableOrdering`] registered in the [`OrderingRegistry`], selected by a
//! marker in the source file names.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Which pages of a source file a merge step takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelector {
    /// Every page, in order
    All,
    /// A single 1-based page number
    Page(u32),
}

/// One step of a merge plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStep {
    pub source: PathBuf,
    pub pages: PageSelector,
}

/// Ordered steps handed to the merger
pub type MergePlan = Vec<MergeStep>;

/// A way of ordering a folder's pages
pub trait PageOrdering: fmt::Debug {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Whether this ordering should handle the given source set
    fn applies_to(&self, sources: &[PathBuf]) -> bool;

    /// Build the merge plan for the given (sorted) sources
    fn plan(&self, sources: &[PathBuf]) -> Result<MergePlan>;
}

/// Concatenate every page of every source in list order
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl PageOrdering for Sequential {
    fn name(&self) -> &str {
        "sequential"
    }

    fn applies_to(&self, _sources: &[PathBuf]) -> bool {
        true
    }

    fn plan(&self, sources: &[PathBuf]) -> Result<MergePlan> {
        Ok(sources
            .iter()
            .map(|source| MergeStep {
                source: source.clone(),
                pages: PageSelector::All,
            })
            .collect())
    }
}

/// Default table for the Drukhari card set: (file index, pages)
///
/// Files 02 and 05 are split, each contributing its first and second page at
/// separate positions. Register a [`TableOrdering`] with a different table to
/// change the order.
pub const DRUKHARI_TABLE: [(u32, PageSelector); 8] = [
    (1, PageSelector::All),
    (2, PageSelector::Page(1)),
    (3, PageSelector::All),
    (2, PageSelector::Page(2)),
    (4, PageSelector::All),
    (5, PageSelector::Page(1)),
    (6, PageSelector::All),
    (5, PageSelector::Page(2)),
];

/// Fixed, table-driven page order triggered by a file name marker
///
/// Each table entry names a file by its two-digit index. A source matches
/// when its file name starts with the index (`"03 back.pdf"`) or carries it
/// at characters 4 and 5 (`"DK_ 03.pdf"`, `"p01_03.pdf"`). When several
/// sources match, the first in sorted order is used.
#[derive(Debug, Clone)]
pub struct TableOrdering {
    name: String,
    marker: String,
    table: Vec<(u32, PageSelector)>,
}

impl TableOrdering {
    pub fn new(
        name: impl Into<String>,
        marker: impl Into<String>,
        table: impl IntoIterator<Item = (u32, PageSelector)>,
    ) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
            table: table.into_iter().collect(),
        }
    }

    /// The Drukhari card set
    pub fn drukhari() -> Self {
        Self::new("drukhari", "Drukhari", DRUKHARI_TABLE)
    }

    pub fn table(&self) -> &[(u32, PageSelector)] {
        &self.table
    }

    fn find_source<'a>(&self, sources: &'a [PathBuf], index: u32) -> Option<&'a PathBuf> {
        let key = format!("{index:02}");
        sources.iter().find(|source| {
            let name = file_name(source);
            name.starts_with(&key) || name.chars().skip(4).take(2).eq(key.chars())
        })
    }
}

impl PageOrdering for TableOrdering {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, sources: &[PathBuf]) -> bool {
        sources
            .iter()
            .any(|source| file_name(source).contains(self.marker.as_str()))
    }

    fn plan(&self, sources: &[PathBuf]) -> Result<MergePlan> {
        self.table
            .iter()
            .map(|&(index, pages)| {
                let source =
                    self.find_source(sources, index)
                        .ok_or_else(|| Error::ReorderSourceMissing {
                            ordering: self.name.clone(),
                            index,
                        })?;
                Ok(MergeStep {
                    source: source.clone(),
                    pages,
                })
            })
            .collect()
    }
}

/// Orderings in priority order, falling back to [`Sequential`]
#[derive(Debug)]
pub struct OrderingRegistry {
    orderings: Vec<Box<dyn PageOrdering>>,
    fallback: Sequential,
}

impl OrderingRegistry {
    /// A registry with no special cases
    pub fn empty() -> Self {
        Self {
            orderings: Vec::new(),
            fallback: Sequential,
        }
    }

    /// Add an ordering; earlier registrations win
    pub fn register(&mut self, ordering: impl PageOrdering + 'static) -> &mut Self {
        self.orderings.push(Box::new(ordering));
        self
    }

    /// Pick the first ordering that applies to `sources`
    pub fn select(&self, sources: &[PathBuf]) -> &dyn PageOrdering {
        self.orderings
            .iter()
            .find(|ordering| ordering.applies_to(sources))
            .map(|ordering| &**ordering)
            .unwrap_or(&self.fallback)
    }
}

impl Default for OrderingRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(TableOrdering::drukhari());
        registry
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
