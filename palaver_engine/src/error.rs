//! Error types surfaced by the loaders and the conversation engine.
//!
//! Nothing here is retried or swallowed: every failure is handed back to the
//! caller, which decides whether to abort the conversation or report it.

use std::path::PathBuf;

use thiserror::Error;

use crate::chatmap::NodeRef;

/// Result alias used throughout the engine.
pub type DialogResult<T> = Result<T, DialogError>;

/// Everything that can go wrong while loading or traversing a dialogue.
#[derive(Debug, Error)]
pub enum DialogError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("could not read dialogue file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dialog node {0} not found")]
    NodeNotFound(NodeRef),
    #[error("twine entry '{0}' not found")]
    EntryNotFound(String),
    #[error("'{0}' is not one of the offered choices")]
    InvalidChoice(String),
    #[error("ambiguous choice link '[[{0}]]'")]
    MalformedChoiceSyntax(String),
    #[error("a choice must be picked before the conversation can advance")]
    AwaitingChoice,
    #[error("the conversation has ended")]
    ConversationEnded,
    #[error("gave up following blank nodes after {hops} hops starting at {start}")]
    RedirectLoop { start: String, hops: usize },
    #[error("entry point {0} does not match the loaded document kind")]
    EntryKindMismatch(String),
}

impl From<serde_json::Error> for DialogError {
    fn from(err: serde_json::Error) -> Self {
        DialogError::MalformedDocument(err.to_string())
    }
}
