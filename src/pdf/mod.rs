//! PDF manipulation module

pub mod merge;
pub mod metadata;
pub mod ordering;

// Re-export commonly used items
pub use merge::{merge_pdfs, planned_page_count, MergeOptions};
pub use metadata::{count_pages, page_label_ranges};
pub use ordering::{
    MergePlan, MergeStep, OrderingRegistry, PageOrdering, PageSelector, Sequential, TableOrdering,
};
