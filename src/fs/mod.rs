//! Filesystem helpers: locating, scanning, listing and staleness checks

pub mod list;
pub mod locate;
pub mod scan;
pub mod stale;

// Re-export commonly used items
pub use list::files_of_type_in_folder;
pub use locate::most_recent_folder_with_prefix;
pub use scan::subfolders_with_files_of_type;
pub use stale::is_up_to_date;

/// True if `name` contains any of the ignore masks
pub(crate) fn matches_ignore_mask(name: &str, ignore_masks: &[String]) -> bool {
    ignore_masks
        .iter()
        .any(|mask| !mask.is_empty() && name.contains(mask.as_str()))
}

/// True if a file name qualifies: right extension and no ignore mask
pub(crate) fn is_candidate_file_name(name: &str, extension: &str, ignore_masks: &[String]) -> bool {
    name.ends_with(extension) && !matches_ignore_mask(name, ignore_masks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masks() -> Vec<String> {
        vec!["OLD".to_string(), "DNU".to_string()]
    }

    #[test]
    fn test_ignore_mask_is_substring_match() {
        assert!(matches_ignore_mask("front_OLD.pdf", &masks()));
        assert!(matches_ignore_mask("DNU back.pdf", &masks()));
        assert!(!matches_ignore_mask("front.pdf", &masks()));
        // Masks are case sensitive
        assert!(!matches_ignore_mask("old front.pdf", &masks()));
    }

    #[test]
    fn test_empty_mask_never_matches() {
        assert!(!matches_ignore_mask("anything.pdf", &[String::new()]));
    }

    #[test]
    fn test_candidate_file_name() {
        assert!(is_candidate_file_name("01 front.pdf", ".pdf", &masks()));
        assert!(!is_candidate_file_name("01 front.png", ".pdf", &masks()));
        assert!(!is_candidate_file_name("01 front OLD.pdf", ".pdf", &masks()));
    }
}
