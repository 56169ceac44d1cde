use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric identifier assigned by the node-graph authoring tool.
pub type Id = i64;

/// Raw `Fields` dictionary as exported; keys are still in authoring-tool casing.
pub type RawFields = BTreeMap<String, FieldValue>;

/// Top-level node-graph export. Every section is required.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ChatMapDef {
    pub title: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub user_script: String,
    pub assets: AssetsDef,
}

/// The `Assets` block of a node-graph export.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AssetsDef {
    pub actors: Vec<AssetDef>,
    pub items: Vec<AssetDef>,
    pub locations: Vec<AssetDef>,
    pub conversations: Vec<ConversationDef>,
    pub user_variables: Vec<UserVariableDef>,
}

/// An actor, item or location: an id plus a bag of fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetDef {
    #[serde(rename = "ID")]
    pub id: Id,
    #[serde(rename = "Fields", default)]
    pub fields: RawFields,
}

/// User variables are not always exported with an id.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserVariableDef {
    #[serde(rename = "ID", default)]
    pub id: Option<Id>,
    #[serde(rename = "Fields", default)]
    pub fields: RawFields,
}

/// A conversation and the dialog nodes it owns.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConversationDef {
    #[serde(rename = "ID")]
    pub id: Id,
    #[serde(rename = "NodeColor", default)]
    pub node_color: String,
    #[serde(rename = "Fields", default)]
    pub fields: RawFields,
    #[serde(rename = "DialogNodes", default)]
    pub dialog_nodes: Vec<DialogNodeDef>,
}

/// A single node of a conversation graph.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DialogNodeDef {
    #[serde(rename = "ID")]
    pub id: Id,
    #[serde(rename = "Fields", default)]
    pub fields: RawFields,
    /// Order is significant: index 0 is the default continuation.
    #[serde(rename = "OutgoingLinks", default)]
    pub outgoing_links: Vec<OutgoingLinkDef>,
    #[serde(rename = "IsRoot", default)]
    pub is_root: bool,
    #[serde(rename = "IsGroup", default)]
    pub is_group: bool,
    #[serde(rename = "NodeColor", default)]
    pub node_color: Option<String>,
}

/// Directed edge between two dialog nodes, possibly across conversations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutgoingLinkDef {
    #[serde(rename = "OriginConvoID", alias = "OriginConversationID")]
    pub origin_conversation_id: Id,
    #[serde(rename = "OriginDialogID")]
    pub origin_dialog_id: Id,
    #[serde(rename = "DestinationConvoID", alias = "DestinationConversationID")]
    pub destination_conversation_id: Id,
    #[serde(rename = "DestinationDialogID")]
    pub destination_dialog_id: Id,
    #[serde(rename = "IsConnector", default)]
    pub is_connector: bool,
    #[serde(rename = "ConditionPriority", default)]
    pub condition_priority: Option<i64>,
}

/// Scalar value found in a `Fields` dictionary.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    #[default]
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Null => Ok(()),
        }
    }
}

/// Hypertext export: either wrapped as `{ "data": [...] }` or a bare array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TwineDef {
    Wrapped { data: Vec<TwineEntryDef> },
    Bare(Vec<TwineEntryDef>),
}

impl TwineDef {
    /// Entries in document order.
    pub fn entries(&self) -> &[TwineEntryDef] {
        match self {
            TwineDef::Wrapped { data } => data,
            TwineDef::Bare(entries) => entries,
        }
    }

    pub fn into_entries(self) -> Vec<TwineEntryDef> {
        match self {
            TwineDef::Wrapped { data } => data,
            TwineDef::Bare(entries) => entries,
        }
    }
}

impl Default for TwineDef {
    fn default() -> Self {
        TwineDef::Wrapped { data: Vec::new() }
    }
}

/// One titled passage of a hypertext export.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TwineEntryDef {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created: FieldValue,
    #[serde(default)]
    pub modified: FieldValue,
    #[serde(default)]
    pub modifier: FieldValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_accept_any_scalar() {
        let fields: RawFields =
            serde_json::from_str(r#"{"Name": "Mira", "Age": 7, "Hp": 2.5, "Is Player": true, "Pictures": null}"#)
                .expect("fields parse");
        assert_eq!(fields["Name"], FieldValue::Text("Mira".into()));
        assert_eq!(fields["Age"], FieldValue::Integer(7));
        assert_eq!(fields["Hp"], FieldValue::Float(2.5));
        assert_eq!(fields["Is Player"], FieldValue::Boolean(true));
        assert!(fields["Pictures"].is_null());
    }

    #[test]
    fn chatmap_requires_every_section() {
        let missing_assets = r#"{"Title":"t","Version":"1","Author":"a","Description":"d","UserScript":""}"#;
        assert!(serde_json::from_str::<ChatMapDef>(missing_assets).is_err());

        let missing_variables = r#"{"Title":"t","Version":"1","Author":"a","Description":"d","UserScript":"",
            "Assets":{"Actors":[],"Items":[],"Locations":[],"Conversations":[]}}"#;
        assert!(serde_json::from_str::<ChatMapDef>(missing_variables).is_err());
    }

    #[test]
    fn link_accepts_long_conversation_names() {
        let link: OutgoingLinkDef = serde_json::from_str(
            r#"{"OriginConversationID":1,"OriginDialogID":2,"DestinationConversationID":3,"DestinationDialogID":4}"#,
        )
        .expect("link parse");
        assert_eq!(link.origin_conversation_id, 1);
        assert_eq!(link.destination_conversation_id, 3);
        assert_eq!(link.destination_dialog_id, 4);
        assert!(!link.is_connector);
    }

    #[test]
    fn twine_accepts_wrapped_and_bare_forms() {
        let wrapped: TwineDef =
            serde_json::from_str(r#"{"data":[{"title":"a","text":"x","tags":[],"created":1,"modified":2,"modifier":"me"}]}"#)
                .expect("wrapped");
        assert_eq!(wrapped.entries().len(), 1);
        assert_eq!(wrapped.entries()[0].created, FieldValue::Integer(1));

        let bare: TwineDef = serde_json::from_str(r#"[{"title":"a","text":"x"},{"title":"b","text":""}]"#).expect("bare");
        assert_eq!(bare.entries().len(), 2);
        assert!(bare.entries()[1].tags.is_empty());
    }
}
