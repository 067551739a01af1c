//! Staleness check for merged outputs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::error::Result;

/// True when `output` exists and is at least as new as every source
///
/// A missing output is never up to date. Any source modified after the
/// output makes it stale.
pub fn is_up_to_date(output: &Path, sources: &[PathBuf]) -> Result<bool> {
    if !output.is_file() {
        return Ok(false);
    }
    let output_modified = fs::metadata(output)?.modified()?;

    for source in sources {
        let source_modified = fs::metadata(source)?.modified()?;
        if source_modified > output_modified {
            tracing::debug!(
                output = %output.display(),
                output_modified = %format_time(output_modified),
                source = %source.display(),
                source_modified = %format_time(source_modified),
                "source is newer than merged output"
            );
            return Ok(false);
        }
    }

    Ok(true)
}

/// Render a filesystem timestamp in local time for log output
pub(crate) fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn set_modified(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_missing_output_is_stale() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("01.pdf");
        fs::write(&source, b"").unwrap();

        let up_to_date = is_up_to_date(&temp_dir.path().join("out.pdf"), &[source]).unwrap();
        assert!(!up_to_date);
    }

    #[test]
    fn test_newer_output_is_up_to_date() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = SystemTime::now() - Duration::from_secs(3600);
        let a = temp_dir.path().join("a.pdf");
        let b = temp_dir.path().join("b.pdf");
        let out = temp_dir.path().join("out.pdf");
        for path in [&a, &b, &out] {
            fs::write(path, b"").unwrap();
        }
        set_modified(&a, base);
        set_modified(&b, base + Duration::from_secs(10));
        set_modified(&out, base + Duration::from_secs(20));

        assert!(is_up_to_date(&out, &[a, b]).unwrap());
    }

    #[test]
    fn test_equal_times_count_as_up_to_date() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let time = SystemTime::now() - Duration::from_secs(60);
        let a = temp_dir.path().join("a.pdf");
        let out = temp_dir.path().join("out.pdf");
        fs::write(&a, b"").unwrap();
        fs::write(&out, b"").unwrap();
        set_modified(&a, time);
        set_modified(&out, time);

        assert!(is_up_to_date(&out, &[a]).unwrap());
    }

    #[test]
    fn test_one_newer_source_makes_output_stale() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = SystemTime::now() - Duration::from_secs(3600);
        let a = temp_dir.path().join("a.pdf");
        let b = temp_dir.path().join("b.pdf");
        let out = temp_dir.path().join("out.pdf");
        for path in [&a, &b, &out] {
            fs::write(path, b"").unwrap();
        }
        set_modified(&a, base);
        set_modified(&out, base + Duration::from_secs(20));
        set_modified(&b, base + Duration::from_secs(30));

        assert!(!is_up_to_date(&out, &[a, b]).unwrap());
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let out = temp_dir.path().join("out.pdf");
        fs::write(&out, b"").unwrap();

        let result = is_up_to_date(&out, &[temp_dir.path().join("gone.pdf")]);
        assert!(result.is_err());
    }
}
