//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::pdf::metadata::count_pages;
use crate::pdf::ordering::{MergePlan, PageSelector};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Steps to assemble, in output order
    pub plan: MergePlan,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// Assemble the pages named by a merge plan into a single PDF
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
///
/// Every step gets its own renumbered copy of its source, so a source that
/// appears in several steps contributes independent page objects each time.
/// The result is labelled with decimal page numbers starting at 1, pruned of
/// unreachable objects, compressed and written through a temporary file that
/// replaces `output_path` only once it is complete.
///
/// Returns the number of pages written.
///
/// # Example
///
/// ```no_run
/// use index_card_joiner::pdf::{merge_pdfs, MergeOptions, MergeStep, PageSelector};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     plan: vec![
///         MergeStep { source: PathBuf::from("01 front.pdf"), pages: PageSelector::All },
///         MergeStep { source: PathBuf::from("02 back.pdf"), pages: PageSelector::Page(1) },
///     ],
///     output_path: PathBuf::from("Card_01_UNQ0450_Project.pdf"),
/// };
///
/// merge_pdfs(&options).expect("Failed to merge");
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<usize> {
    if options.plan.is_empty() {
        return Err(Error::NothingToMerge(options.output_path.clone()));
    }

    let sources = load_sources(&options.plan)?;

    // Define a starting max_id for merged document
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for step in &options.plan {
        let mut doc = sources[&step.source].clone();

        // Renumber objects in this copy to avoid conflicts
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages = doc.get_pages();
        let selected: Vec<ObjectId> = match step.pages {
            PageSelector::All => pages.values().copied().collect(),
            PageSelector::Page(number) => {
                let id = pages.get(&number).copied().ok_or_else(|| Error::PageOutOfRange {
                    path: step.source.clone(),
                    page: number,
                    count: pages.len(),
                })?;
                vec![id]
            }
        };

        // Pages are reparented below, so pull down anything they inherit
        for &page_id in &selected {
            inherit_page_attributes(&mut doc, page_id)?;
        }

        tracing::trace!(
            source = %step.source.display(),
            pages = selected.len(),
            "appending pages"
        );
        page_ids.extend(selected);
        objects.extend(doc.objects);
    }

    let mut merged_doc = Document::with_version("1.5");
    merged_doc.objects.extend(objects);

    // new_object_id() must hand out IDs above everything just added
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = merged_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    catalog.set("PageLabels", Object::Dictionary(decimal_page_labels()));

    merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged_doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    merged_doc.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = merged_doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    // Garbage collection, cleanup and deflate before writing
    let pruned = merged_doc.prune_objects();
    merged_doc.delete_zero_length_streams();
    merged_doc.renumber_objects();
    merged_doc.compress();
    tracing::trace!(pruned = pruned.len(), "pruned unreachable objects");

    save_replacing(&mut merged_doc, &options.output_path)?;

    Ok(page_ids.len())
}

/// Number of pages a plan would produce, loading each source once
pub fn planned_page_count(plan: &MergePlan) -> Result<usize> {
    let mut counts: BTreeMap<&Path, usize> = BTreeMap::new();
    let mut total = 0;

    for step in plan {
        let count = match counts.get(step.source.as_path()) {
            Some(&count) => count,
            None => {
                let count = count_pages(&step.source)?;
                counts.insert(&step.source, count);
                count
            }
        };
        total += match step.pages {
            PageSelector::All => count,
            PageSelector::Page(number) if number >= 1 && number as usize <= count => 1,
            PageSelector::Page(number) => {
                return Err(Error::PageOutOfRange {
                    path: step.source.clone(),
                    page: number,
                    count,
                })
            }
        };
    }

    Ok(total)
}

/// Load every distinct source of a plan
fn load_sources(plan: &MergePlan) -> Result<BTreeMap<PathBuf, Document>> {
    let mut sources = BTreeMap::new();
    for step in plan {
        if sources.contains_key(&step.source) {
            continue;
        }
        if !step.source.exists() {
            return Err(Error::FileNotFound(step.source.clone()));
        }

        let doc = Document::load(&step.source)?;
        if doc.get_pages().is_empty() {
            return Err(Error::EmptyPdf(step.source.clone()));
        }

        sources.insert(step.source.clone(), doc);
    }
    Ok(sources)
}

/// One label range covering the whole document: decimal, starting at 1
fn decimal_page_labels() -> Dictionary {
    let mut range = Dictionary::new();
    range.set("S", Object::Name(b"D".to_vec()));
    range.set("St", Object::Integer(1));

    let mut labels = Dictionary::new();
    labels.set(
        "Nums",
        Object::Array(vec![Object::Integer(0), Object::Dictionary(range)]),
    );
    labels
}

/// Copy inherited attributes from the page tree onto the page itself
fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    {
        let page = doc.get_dictionary(page_id)?;
        let mut missing: Vec<&[u8]> = INHERITABLE_ATTRIBUTES
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();

        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        let mut visited = Vec::new();
        while let Some(parent_id) = parent {
            if missing.is_empty() || visited.contains(&parent_id) {
                break;
            }
            visited.push(parent_id);

            let Ok(node) = doc.get_dictionary(parent_id) else {
                break;
            };
            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((key.to_vec(), value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
    }

    if !inherited.is_empty() {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    Ok(())
}

/// Save through a `.part` sibling, then move it over `path`
fn save_replacing(doc: &mut Document, path: &Path) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    if let Err(e) = doc.save(&partial) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }

    Ok(())
}
