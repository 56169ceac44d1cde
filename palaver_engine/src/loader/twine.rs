//! Hypertext export loader.

use std::path::Path;

use log::{info, warn};
use palaver_data::{TwineDef, validate_twine};

use crate::error::DialogResult;
use crate::loader::{read_source, report_findings};
use crate::twine::{TwineDocument, TwineEntry};

/// Read and convert a hypertext export.
///
/// # Errors
/// `Io` if the file is unreadable; `MalformedDocument` if it is not a valid export.
pub fn load_twine(path: &Path) -> DialogResult<TwineDocument> {
    let src = read_source(path)?;
    let doc = TwineDocument::from_json_str(&src)?;
    info!("hypertext export loaded from '{}'", path.display());
    Ok(doc)
}

/// Convert a parsed `TwineDef` into a document.
pub fn build_twine(def: TwineDef) -> TwineDocument {
    report_findings("hypertext export", &validate_twine(&def));

    let doc = TwineDocument::from_entries(def.into_entries().into_iter().map(|entry| TwineEntry {
        title: entry.title,
        text: entry.text,
        tags: entry.tags,
        created: entry.created,
        modified: entry.modified,
        modifier: entry.modifier,
    }));
    for (from, to) in doc.dangling_links() {
        warn!("hypertext export: entry '{from}' links to missing entry '{to}'");
    }
    info!("{} entries added to document", doc.len());
    doc
}
