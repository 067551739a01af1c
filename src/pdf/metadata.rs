//! PDF metadata extraction

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::{Error, Result};

/// Count pages by reading the Count field from the root Pages dictionary
/// This is more reliable than get_pages() which doesn't handle nested page trees
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let pages_id = doc.catalog()?.get(b"Pages")?.as_reference()?;
    let count = doc.get_dictionary(pages_id)?.get(b"Count")?.as_i64()?;
    Ok(count.max(0) as usize)
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}

/// Page label ranges of a document as (start index, style, first number)
///
/// Returns an empty list when the catalog carries no `/PageLabels`.
pub fn page_label_ranges(doc: &Document) -> Result<Vec<(i64, Option<String>, i64)>> {
    let labels = match doc.catalog()?.get(b"PageLabels") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id)?,
        Ok(Object::Dictionary(dict)) => dict,
        _ => return Ok(Vec::new()),
    };

    let nums = labels.get(b"Nums")?.as_array()?;
    let mut ranges = Vec::new();
    for pair in nums.chunks(2) {
        let [start, range] = pair else {
            break;
        };
        let range = match range {
            Object::Reference(id) => doc.get_dictionary(*id)?,
            other => other.as_dict()?,
        };
        let style = range
            .get(b"S")
            .and_then(Object::as_name)
            .ok()
            .map(|name| String::from_utf8_lossy(name).into_owned());
        let first = range.get(b"St").and_then(Object::as_i64).unwrap_or(1);
        ranges.push((start.as_i64()?, style, first));
    }

    Ok(ranges)
}
