//! The seam between loaded documents and the conversation engine.
//!
//! A [`DialogSource`] turns a node address into a [`Beat`]: the text the node
//! contributes plus what happens once that text is exhausted. Node-graph and
//! hypertext documents resolve addresses very differently, but the engine only
//! ever sees beats.

use std::fmt;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::chatmap::{ChatMapDocument, NodeRef};
use crate::error::{DialogError, DialogResult};
use crate::twine::TwineDocument;

/// A document the engine can walk.
pub trait DialogSource {
    /// Address of a single node in this document.
    type Key: Clone + PartialEq + fmt::Debug + fmt::Display;

    /// Resolve exactly one node; no bridging or root skipping happens here.
    ///
    /// # Errors
    /// Fails when `key` (or a node it needs to label a menu) does not exist.
    fn resolve(&self, key: &Self::Key) -> DialogResult<Beat<Self::Key>>;
}

/// One selectable option of a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption<K> {
    pub id: K,
    pub label: String,
}

impl<K> ChoiceOption<K> {
    pub fn new(id: K, label: impl Into<String>) -> Self {
        Self { id, label: label.into() }
    }
}

/// What follows a node once all of its text has been shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation<K> {
    End,
    Follow(K),
    Menu(Vec<ChoiceOption<K>>),
}

/// The presentable content of a single node.
///
/// A beat without segments whose continuation is not a menu is a pass-through
/// (a root header or a blank bridge); the engine never presents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beat<K> {
    pub key: K,
    pub speaker: Option<String>,
    pub segments: Vec<String>,
    pub then: Continuation<K>,
}

impl<K> Beat<K> {
    pub fn is_pass_through(&self) -> bool {
        self.segments.is_empty() && !matches!(self.then, Continuation::Menu(_))
    }

    /// Re-address a beat and everything it points at.
    pub fn map_key<J>(self, f: impl Fn(K) -> J) -> Beat<J> {
        let then = match self.then {
            Continuation::End => Continuation::End,
            Continuation::Follow(next) => Continuation::Follow(f(next)),
            Continuation::Menu(options) => Continuation::Menu(
                options
                    .into_iter()
                    .map(|opt| ChoiceOption::new(f(opt.id), opt.label))
                    .collect(),
            ),
        };
        Beat {
            key: f(self.key),
            speaker: self.speaker,
            segments: self.segments,
            then,
        }
    }
}

/// Where a conversation begins, for either kind of document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum EntryPoint {
    ChatMap(NodeRef),
    Twine(String),
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPoint::ChatMap(node) => write!(f, "{node}"),
            EntryPoint::Twine(title) => write!(f, "{title}"),
        }
    }
}

impl From<NodeRef> for EntryPoint {
    fn from(node: NodeRef) -> Self {
        EntryPoint::ChatMap(node)
    }
}

impl From<String> for EntryPoint {
    fn from(title: String) -> Self {
        EntryPoint::Twine(title)
    }
}

impl From<&str> for EntryPoint {
    fn from(title: &str) -> Self {
        EntryPoint::Twine(title.to_string())
    }
}

/// A loaded document of either kind, for callers that don't know the format up front.
#[derive(Debug, Clone)]
pub enum Document {
    ChatMap(ChatMapDocument),
    Twine(TwineDocument),
}

impl Document {
    /// Parse either export format, deciding by the shape of the JSON.
    ///
    /// # Errors
    /// `MalformedDocument` when the source is not JSON or matches neither format.
    pub fn from_json_str(src: &str) -> DialogResult<Self> {
        let value: serde_json::Value = serde_json::from_str(src)?;
        let is_chatmap = value.get("Assets").is_some();
        let is_twine = value.is_array() || value.get("data").is_some();
        if is_chatmap {
            info!("detected node-graph export");
            Ok(Document::ChatMap(ChatMapDocument::from_json_value(value)?))
        } else if is_twine {
            info!("detected hypertext export");
            Ok(Document::Twine(TwineDocument::from_json_value(value)?))
        } else {
            Err(DialogError::MalformedDocument(
                "expected a node-graph export (with \"Assets\") or a hypertext export (with \"data\")".into(),
            ))
        }
    }

    /// Read and parse a document from disk.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`Document::from_json_str`].
    pub fn load(path: &Path) -> DialogResult<Self> {
        crate::loader::load_document(path)
    }

    /// First conversation's entry node, or the first hypertext entry.
    pub fn default_entry(&self) -> Option<EntryPoint> {
        match self {
            Document::ChatMap(doc) => {
                let conversation_id = doc.first_conversation_id()?;
                doc.conversation_entry(conversation_id).map(EntryPoint::ChatMap)
            },
            Document::Twine(doc) => doc.first_title().map(|t| EntryPoint::Twine(t.to_string())),
        }
    }
}

impl DialogSource for Document {
    type Key = EntryPoint;

    fn resolve(&self, key: &EntryPoint) -> DialogResult<Beat<EntryPoint>> {
        match (self, key) {
            (Document::ChatMap(doc), EntryPoint::ChatMap(node)) => Ok(doc.resolve(node)?.map_key(EntryPoint::ChatMap)),
            (Document::Twine(doc), EntryPoint::Twine(title)) => Ok(doc.resolve(title)?.map_key(EntryPoint::Twine)),
            _ => Err(DialogError::EntryKindMismatch(key.to_string())),
        }
    }
}
