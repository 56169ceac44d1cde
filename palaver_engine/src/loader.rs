//! Loader utilities for building dialogue documents from exported JSON.
//!
//! Each format has a raw serde model in `palaver_data`; the submodules here
//! convert those into the engine's read-only documents and report any
//! cross-reference problems the validator finds.

pub mod chatmap;
pub mod twine;

pub use chatmap::{build_chatmap, load_chatmap};
pub use twine::{build_twine, load_twine};

use std::fs;
use std::path::Path;

use log::{info, warn};
use palaver_data::ValidationError;

use crate::error::{DialogError, DialogResult};
use crate::source::Document;

/// Load a dialogue file of either format, detected from its contents.
///
/// # Errors
/// `Io` when the file cannot be read; `MalformedDocument` when it is neither export format.
pub fn load_document(path: &Path) -> DialogResult<Document> {
    let src = read_source(path)?;
    let document = Document::from_json_str(&src)?;
    info!("dialogue document loaded from '{}'", path.display());
    Ok(document)
}

pub(crate) fn read_source(path: &Path) -> DialogResult<String> {
    fs::read_to_string(path).map_err(|source| DialogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Findings never abort a load; unresolved references fail later, when traversal reaches them.
pub(crate) fn report_findings(kind: &str, findings: &[ValidationError]) {
    for finding in findings {
        warn!("{kind} validation: {finding}");
    }
    if !findings.is_empty() {
        warn!("{} problem(s) found in {kind}", findings.len());
    }
}
