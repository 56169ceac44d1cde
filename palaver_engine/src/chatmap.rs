//! In-memory model of a node-graph dialogue export.
//!
//! A [`ChatMapDocument`] is built once by the loader and is read-only after
//! that; any number of conversations may walk it at the same time.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use palaver_data::Id;
use serde::Serialize;

use crate::error::{DialogError, DialogResult};
use crate::fields::{FieldBag, keys};
use crate::source::{Beat, ChoiceOption, Continuation, DialogSource};

/// Typed address of a dialog node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeRef {
    pub conversation_id: Id,
    pub node_id: Id,
}

impl NodeRef {
    pub fn new(conversation_id: Id, node_id: Id) -> Self {
        Self {
            conversation_id,
            node_id,
        }
    }

    /// The node that conventionally follows a root header. `None` when the id space is exhausted.
    pub fn successor(self) -> Option<Self> {
        Some(Self::new(self.conversation_id, self.node_id.checked_add(1)?))
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.conversation_id, self.node_id)
    }
}

/// A record that is nothing but an id and its fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    pub id: Id,
    pub fields: FieldBag,
}

impl Asset {
    pub fn name(&self) -> Option<String> {
        self.fields.text(keys::NAME)
    }
}

pub type Actor = Asset;
pub type Item = Asset;
pub type Location = Asset;
pub type UserVariable = Asset;

/// Directed edge from one dialog node to another, possibly in another conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingLink {
    pub origin_conversation_id: Id,
    pub origin_dialog_id: Id,
    pub destination_conversation_id: Id,
    pub destination_dialog_id: Id,
}

impl OutgoingLink {
    pub fn origin(&self) -> NodeRef {
        NodeRef::new(self.origin_conversation_id, self.origin_dialog_id)
    }

    pub fn destination(&self) -> NodeRef {
        NodeRef::new(self.destination_conversation_id, self.destination_dialog_id)
    }
}

/// A single node of a conversation graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogNode {
    pub id: Id,
    pub conversation_id: Id,
    /// Header node opening a conversation; never presented.
    pub is_root: bool,
    /// Menu node; offers its links as choices and has no text of its own.
    pub is_group: bool,
    pub actor_id: Option<Id>,
    pub title: String,
    pub menu_text: String,
    /// Raw text; may contain `{placeholder}`s and `|` line breaks.
    pub dialogue_text: String,
    pub fields: FieldBag,
    /// Index 0 is the default continuation.
    pub outgoing_links: Vec<OutgoingLink>,
}

impl DialogNode {
    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.conversation_id, self.id)
    }

    /// No text and no menu: the node only redirects traversal.
    pub fn is_blank_bridge(&self) -> bool {
        !self.is_group && self.dialogue_text.trim().is_empty()
    }

    /// Label used when this node is offered as a choice.
    pub fn choice_label(&self) -> &str {
        [&self.menu_text, &self.title, &self.dialogue_text]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .map_or("", String::as_str)
    }

    pub fn default_link(&self) -> Option<&OutgoingLink> {
        self.outgoing_links.first()
    }
}

/// A conversation and the nodes it owns, looked up by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    pub id: Id,
    /// Authoring metadata only.
    pub node_color: String,
    pub fields: FieldBag,
    pub dialog_nodes: HashMap<Id, DialogNode>,
}

impl Conversation {
    pub fn title(&self) -> Option<String> {
        self.fields.text(keys::TITLE)
    }

    /// The root header if there is one, otherwise the lowest node id.
    pub fn entry_node_id(&self) -> Option<Id> {
        self.dialog_nodes
            .values()
            .filter(|n| n.is_root)
            .map(|n| n.id)
            .min()
            .or_else(|| self.dialog_nodes.keys().copied().min())
    }
}

/// Immutable aggregate of everything in a node-graph export.
#[derive(Debug, Clone, Default)]
pub struct ChatMapDocument {
    pub title: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub user_script: String,
    pub actors: BTreeMap<Id, Actor>,
    pub items: BTreeMap<Id, Item>,
    pub locations: BTreeMap<Id, Location>,
    pub conversations: BTreeMap<Id, Conversation>,
    pub user_variables: BTreeMap<Id, UserVariable>,
}

impl ChatMapDocument {
    /// Parse a node-graph export held in memory.
    ///
    /// # Errors
    /// `MalformedDocument` if the JSON is invalid or a required section is missing.
    pub fn from_json_str(src: &str) -> DialogResult<Self> {
        let def = serde_json::from_str(src)?;
        Ok(crate::loader::build_chatmap(&def))
    }

    pub(crate) fn from_json_value(value: serde_json::Value) -> DialogResult<Self> {
        let def = serde_json::from_value(value)?;
        Ok(crate::loader::build_chatmap(&def))
    }

    /// Read a node-graph export from disk.
    ///
    /// # Errors
    /// `Io` if unreadable, `MalformedDocument` if it does not parse.
    pub fn load(path: &Path) -> DialogResult<Self> {
        crate::loader::load_chatmap(path)
    }

    pub fn conversation(&self, id: Id) -> Option<&Conversation> {
        self.conversations.get(&id)
    }

    pub fn node(&self, node: NodeRef) -> Option<&DialogNode> {
        self.conversations.get(&node.conversation_id)?.dialog_nodes.get(&node.node_id)
    }

    pub fn actor(&self, id: Id) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Display name of the actor speaking `node`, if it has one.
    pub fn speaker_name(&self, node: &DialogNode) -> Option<String> {
        self.actor(node.actor_id?)?.name()
    }

    pub fn first_conversation_id(&self) -> Option<Id> {
        self.conversations.keys().next().copied()
    }

    /// Address at which a conversation should be started.
    pub fn conversation_entry(&self, conversation_id: Id) -> Option<NodeRef> {
        let node_id = self.conversation(conversation_id)?.entry_node_id()?;
        Some(NodeRef::new(conversation_id, node_id))
    }

    fn require_node(&self, node: NodeRef) -> DialogResult<&DialogNode> {
        self.node(node).ok_or(DialogError::NodeNotFound(node))
    }
}

impl DialogSource for ChatMapDocument {
    type Key = NodeRef;

    fn resolve(&self, key: &NodeRef) -> DialogResult<Beat<NodeRef>> {
        let node = self.require_node(*key)?;

        if node.is_root {
            return Ok(Beat {
                key: *key,
                speaker: None,
                segments: Vec::new(),
                then: key.successor().map_or(Continuation::End, Continuation::Follow),
            });
        }

        if node.is_group && !node.outgoing_links.is_empty() {
            let options = node
                .outgoing_links
                .iter()
                .map(|link| {
                    let target = self.require_node(link.destination())?;
                    Ok(ChoiceOption::new(link.destination(), target.choice_label()))
                })
                .collect::<DialogResult<Vec<_>>>()?;
            return Ok(Beat {
                key: *key,
                speaker: None,
                segments: Vec::new(),
                then: Continuation::Menu(options),
            });
        }

        let then = node
            .default_link()
            .map_or(Continuation::End, |link| Continuation::Follow(link.destination()));

        if node.is_group || node.is_blank_bridge() {
            return Ok(Beat {
                key: *key,
                speaker: None,
                segments: Vec::new(),
                then,
            });
        }

        Ok(Beat {
            key: *key,
            speaker: self.speaker_name(node),
            segments: vec![node.dialogue_text.clone()],
            then,
        })
    }
}
