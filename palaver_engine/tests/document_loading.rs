use std::path::{Path, PathBuf};

use palaver_engine::fields::keys;
use palaver_engine::{
    Conversation, DialogError, Document, EntryPoint, Frame, NodeRef, WordOverrides, load_chatmap, load_config,
    load_document,
};

fn data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[test]
fn format_is_detected_from_contents() {
    let chatmap = load_document(&data("tavern.chatmap.json")).expect("chatmap");
    assert!(matches!(chatmap, Document::ChatMap(_)));
    assert_eq!(chatmap.default_entry(), Some(EntryPoint::ChatMap(NodeRef::new(1, 0))));

    let twine = Document::load(&data("lighthouse.twine.json")).expect("twine");
    assert!(matches!(twine, Document::Twine(_)));
    assert_eq!(twine.default_entry(), Some(EntryPoint::Twine("Start".into())));
}

#[test]
fn document_drives_either_kind_through_one_engine() {
    let twine = Document::load(&data("lighthouse.twine.json")).expect("twine");
    let mut convo = Conversation::new(&twine);
    let frame = convo
        .start(EntryPoint::Twine("Leave".into()), Some(WordOverrides::new()))
        .expect("start");
    assert_eq!(
        frame,
        Frame::Text {
            speaker: None,
            line: "You close the door behind you.".into(),
        }
    );

    let chatmap = Document::load(&data("tavern.chatmap.json")).expect("chatmap");
    let mut convo = Conversation::new(&chatmap);
    let entry = chatmap.default_entry().expect("entry");
    convo.start(entry, None).expect("start");
    assert_eq!(convo.active_key(), Some(&EntryPoint::ChatMap(NodeRef::new(1, 1))));
}

#[test]
fn entry_of_the_wrong_kind_is_rejected() {
    let twine = Document::load(&data("lighthouse.twine.json")).expect("twine");
    let mut convo = Conversation::new(&twine);
    assert!(matches!(
        convo.start(NodeRef::new(1, 0), None),
        Err(DialogError::EntryKindMismatch(_))
    ));
}

#[test]
fn unknown_shapes_are_malformed() {
    assert!(matches!(
        Document::from_json_str(r#"{"passages": []}"#),
        Err(DialogError::MalformedDocument(_))
    ));
    assert!(matches!(Document::from_json_str("not json"), Err(DialogError::MalformedDocument(_))));
}

#[test]
fn chatmap_records_are_available_after_load() {
    let doc = load_chatmap(&data("tavern.chatmap.json")).expect("chatmap");
    assert_eq!(doc.title, "The Gilded Tankard");
    assert_eq!(doc.author, "Palaver Samples");
    assert_eq!(doc.actor(1).and_then(|a| a.name()).as_deref(), Some("Barkeep"));
    assert_eq!(doc.actors[&2].fields.text(keys::IS_PLAYER).as_deref(), Some("True"));
    assert_eq!(doc.items[&3].name().as_deref(), Some("Ale Mug"));
    assert_eq!(doc.locations[&4].name().as_deref(), Some("Cellar"));
    assert_eq!(doc.user_variables[&0].fields.integer(keys::INITIAL_VALUE), Some(12));
    assert_eq!(doc.user_variables[&7].fields.boolean(keys::INITIAL_VALUE), Some(false));

    let conversation = doc.conversation(2).expect("conversation 2");
    assert_eq!(conversation.title().as_deref(), Some("Rumours"));
    assert_eq!(conversation.dialog_nodes.len(), 3);

    let group = doc.node(NodeRef::new(1, 2)).expect("group");
    assert!(group.is_group);
    assert_eq!(group.fields.integer(keys::CONVERSANT), Some(1));
    let targets: Vec<_> = group.outgoing_links.iter().map(|l| l.destination()).collect();
    assert_eq!(targets, vec![NodeRef::new(1, 3), NodeRef::new(1, 4), NodeRef::new(1, 5)]);
}

#[test]
fn bundled_config_loads() {
    let config = load_config(&data("palaver.toml"));
    assert_eq!(config.max_redirects, 64);
    assert_eq!(config.line_break, "\n");
}
