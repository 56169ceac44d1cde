use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::*;

/// Validation error for malformed or missing references in an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate ids and link targets in a node-graph export.
///
/// ```
/// use palaver_data::{AssetsDef, ChatMapDef, ConversationDef, DialogNodeDef, OutgoingLinkDef, validate_chatmap};
///
/// let link = OutgoingLinkDef {
///     origin_conversation_id: 1,
///     origin_dialog_id: 0,
///     destination_conversation_id: 1,
///     destination_dialog_id: 1,
///     ..OutgoingLinkDef::default()
/// };
/// let chatmap = ChatMapDef {
///     title: "Demo".into(),
///     assets: AssetsDef {
///         conversations: vec![ConversationDef {
///             id: 1,
///             dialog_nodes: vec![
///                 DialogNodeDef { id: 0, is_root: true, outgoing_links: vec![link], ..DialogNodeDef::default() },
///                 DialogNodeDef { id: 1, ..DialogNodeDef::default() },
///             ],
///             ..ConversationDef::default()
///         }],
///         ..AssetsDef::default()
///     },
///     ..ChatMapDef::default()
/// };
/// assert!(validate_chatmap(&chatmap).is_empty());
/// ```
pub fn validate_chatmap(chatmap: &ChatMapDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let assets = &chatmap.assets;

    let mut conversations = HashSet::new();
    let mut nodes = HashSet::new();

    track_ids(
        "actor",
        assets.actors.iter().map(|a| (a.id, a.id.to_string())),
        &mut HashSet::new(),
        &mut errors,
    );
    track_ids(
        "item",
        assets.items.iter().map(|i| (i.id, i.id.to_string())),
        &mut HashSet::new(),
        &mut errors,
    );
    track_ids(
        "location",
        assets.locations.iter().map(|l| (l.id, l.id.to_string())),
        &mut HashSet::new(),
        &mut errors,
    );
    track_ids(
        "conversation",
        assets.conversations.iter().map(|c| (c.id, c.id.to_string())),
        &mut conversations,
        &mut errors,
    );
    // Variables exported without an id are keyed by position, which may clash with an explicit id.
    track_ids(
        "user variable",
        assets.user_variables.iter().enumerate().map(|(idx, var)| {
            let id = var.id.unwrap_or(Id::try_from(idx).unwrap_or(Id::MAX));
            (id, id.to_string())
        }),
        &mut HashSet::new(),
        &mut errors,
    );
    for conversation in &assets.conversations {
        track_ids(
            "dialog node",
            conversation
                .dialog_nodes
                .iter()
                .map(|n| ((conversation.id, n.id), node_key(conversation.id, n.id))),
            &mut nodes,
            &mut errors,
        );
    }

    for conversation in &assets.conversations {
        for node in &conversation.dialog_nodes {
            let context = format!("conversation {} node {}", conversation.id, node.id);

            if node.is_root {
                match node.id.checked_add(1) {
                    Some(next) if nodes.contains(&(conversation.id, next)) => {},
                    Some(next) => errors.push(ValidationError::MissingReference {
                        kind: "dialog node",
                        id: node_key(conversation.id, next),
                        context: format!("{context} root continuation"),
                    }),
                    None => errors.push(ValidationError::InvalidValue {
                        context: format!("{context} is a root with no room for a continuation id"),
                    }),
                }
            }

            for (idx, link) in node.outgoing_links.iter().enumerate() {
                if link.origin_conversation_id != conversation.id || link.origin_dialog_id != node.id {
                    errors.push(ValidationError::InvalidValue {
                        context: format!(
                            "{context} link {idx} claims origin {}",
                            node_key(link.origin_conversation_id, link.origin_dialog_id)
                        ),
                    });
                }
                if !conversations.contains(&link.destination_conversation_id) {
                    errors.push(ValidationError::MissingReference {
                        kind: "conversation",
                        id: link.destination_conversation_id.to_string(),
                        context: format!("{context} link {idx}"),
                    });
                } else if !nodes.contains(&(link.destination_conversation_id, link.destination_dialog_id)) {
                    errors.push(ValidationError::MissingReference {
                        kind: "dialog node",
                        id: node_key(link.destination_conversation_id, link.destination_dialog_id),
                        context: format!("{context} link {idx}"),
                    });
                }
            }
        }
    }

    errors
}

/// Validate titles in a hypertext export.
pub fn validate_twine(twine: &TwineDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut titles = HashSet::new();

    for (idx, entry) in twine.entries().iter().enumerate() {
        if entry.title.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("entry {idx} has an empty title"),
            });
        }
    }
    track_ids(
        "entry",
        twine.entries().iter().map(|e| (e.title.as_str(), e.title.clone())),
        &mut titles,
        &mut errors,
    );

    errors
}

fn node_key(conversation_id: Id, node_id: Id) -> String {
    format!("{conversation_id}:{node_id}")
}

fn track_ids<T: Hash + Eq>(
    kind: &'static str,
    ids: impl Iterator<Item = (T, String)>,
    set: &mut HashSet<T>,
    errors: &mut Vec<ValidationError>,
) {
    for (id, shown) in ids {
        if !set.insert(id) {
            errors.push(ValidationError::DuplicateId { kind, id: shown });
        }
    }
}
