//! Node-graph export loader.
//!
//! Converts the serialized `ChatMapDef` into a [`ChatMapDocument`], normalizing
//! field names and pulling the fields the engine reads into typed node members.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;
use palaver_data::{AssetDef, ChatMapDef, ConversationDef, DialogNodeDef, OutgoingLinkDef, validate_chatmap};

use crate::chatmap::{Asset, ChatMapDocument, Conversation, DialogNode, OutgoingLink};
use crate::error::DialogResult;
use crate::fields::{FieldBag, keys};
use crate::loader::{read_source, report_findings};

/// Read and convert a node-graph export.
///
/// # Errors
/// `Io` if the file is unreadable; `MalformedDocument` if it is not valid JSON or lacks a required section.
pub fn load_chatmap(path: &Path) -> DialogResult<ChatMapDocument> {
    let src = read_source(path)?;
    let doc = ChatMapDocument::from_json_str(&src)?;
    info!("node-graph export '{}' loaded from '{}'", doc.title, path.display());
    Ok(doc)
}

/// Convert a parsed `ChatMapDef` into a document.
pub fn build_chatmap(def: &ChatMapDef) -> ChatMapDocument {
    report_findings("node-graph export", &validate_chatmap(def));

    let assets = &def.assets;
    let doc = ChatMapDocument {
        title: def.title.clone(),
        version: def.version.clone(),
        author: def.author.clone(),
        description: def.description.clone(),
        user_script: def.user_script.clone(),
        actors: assets_by_id(&assets.actors),
        items: assets_by_id(&assets.items),
        locations: assets_by_id(&assets.locations),
        conversations: assets
            .conversations
            .iter()
            .map(|c| (c.id, conversation_from_def(c)))
            .collect(),
        user_variables: assets
            .user_variables
            .iter()
            .enumerate()
            .map(|(idx, var)| {
                let id = var.id.unwrap_or(i64::try_from(idx).unwrap_or(i64::MAX));
                (
                    id,
                    Asset {
                        id,
                        fields: FieldBag::from_raw(&var.fields),
                    },
                )
            })
            .collect(),
    };

    info!("{} actors added to document", doc.actors.len());
    info!("{} items added to document", doc.items.len());
    info!("{} locations added to document", doc.locations.len());
    info!("{} conversations added to document", doc.conversations.len());
    info!("{} user variables added to document", doc.user_variables.len());
    doc
}

fn assets_by_id(defs: &[AssetDef]) -> BTreeMap<i64, Asset> {
    defs.iter()
        .map(|def| {
            (
                def.id,
                Asset {
                    id: def.id,
                    fields: FieldBag::from_raw(&def.fields),
                },
            )
        })
        .collect()
}

fn conversation_from_def(def: &ConversationDef) -> Conversation {
    Conversation {
        id: def.id,
        node_color: def.node_color.clone(),
        fields: FieldBag::from_raw(&def.fields),
        dialog_nodes: def
            .dialog_nodes
            .iter()
            .map(|n| (n.id, node_from_def(def.id, n)))
            .collect(),
    }
}

fn node_from_def(conversation_id: i64, def: &DialogNodeDef) -> DialogNode {
    let fields = FieldBag::from_raw(&def.fields);
    DialogNode {
        id: def.id,
        conversation_id,
        is_root: def.is_root,
        is_group: def.is_group,
        actor_id: fields.integer(keys::ACTOR),
        title: fields.text(keys::TITLE).unwrap_or_default(),
        menu_text: fields.text(keys::MENU_TEXT).unwrap_or_default(),
        dialogue_text: fields.text(keys::DIALOGUE_TEXT).unwrap_or_default(),
        outgoing_links: def.outgoing_links.iter().map(link_from_def).collect(),
        fields,
    }
}

fn link_from_def(def: &OutgoingLinkDef) -> OutgoingLink {
    OutgoingLink {
        origin_conversation_id: def.origin_conversation_id,
        origin_dialog_id: def.origin_dialog_id,
        destination_conversation_id: def.destination_conversation_id,
        destination_dialog_id: def.destination_dialog_id,
    }
}
