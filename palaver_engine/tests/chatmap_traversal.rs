use std::path::{Path, PathBuf};

use palaver_engine::{
    ChatMapDocument, ChoiceOption, Conversation, ConversationState, DialogError, EngineConfig, Frame, NodeRef,
    WordOverrides,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn tavern() -> ChatMapDocument {
    ChatMapDocument::load(&fixture("tavern.chatmap.json")).expect("tavern fixture loads")
}

fn hero() -> Option<WordOverrides> {
    Some(WordOverrides::new().with("hero", "Aria"))
}

fn text(speaker: &str, line: &str) -> Frame<NodeRef> {
    Frame::Text {
        speaker: Some(speaker.to_string()),
        line: line.to_string(),
    }
}

#[test]
fn root_is_skipped_and_first_line_is_rendered() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    let frame = convo.start(NodeRef::new(1, 0), hero()).expect("start");

    assert_eq!(frame, text("Barkeep", "Evening, Aria.\nWhat'll it be?"));
    assert_eq!(convo.active_key(), Some(&NodeRef::new(1, 1)));
    assert_eq!(convo.state(), ConversationState::PresentingText);
    assert_eq!(convo.current_frame(), convo.current_frame());
}

#[test]
fn group_node_offers_labelled_menu_in_link_order() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    convo.start(NodeRef::new(1, 0), hero()).expect("start");

    let frame = convo.advance().expect("advance to menu");
    assert_eq!(
        frame,
        Frame::Choices {
            options: vec![
                ChoiceOption::new(NodeRef::new(1, 3), "An ale, please."),
                ChoiceOption::new(NodeRef::new(1, 4), "Any news, {barkeep}?"),
                ChoiceOption::new(NodeRef::new(1, 5), "Leave"),
            ],
        }
    );
    assert_eq!(convo.state(), ConversationState::PresentingChoices);
    assert_eq!(convo.active_key(), Some(&NodeRef::new(1, 2)));
    assert_eq!(convo.text_cursor(), None);
    assert!(matches!(convo.advance(), Err(DialogError::AwaitingChoice)));
}

#[test]
fn choosing_walks_to_the_end() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    convo.start(NodeRef::new(1, 0), hero()).expect("start");
    convo.advance().expect("menu");

    let frame = convo.choose(NodeRef::new(1, 3)).expect("choose ale");
    assert_eq!(frame, text("Aria", "One ale, and keep them coming."));

    let frame = convo.advance().expect("reply");
    assert_eq!(frame, text("Barkeep", "Coming right up."));

    assert_eq!(convo.advance().expect("end"), Frame::Ended);
    assert!(convo.is_ended());
    assert!(matches!(convo.advance(), Err(DialogError::ConversationEnded)));
    assert!(matches!(convo.choose(NodeRef::new(1, 3)), Err(DialogError::InvalidChoice(_))));
}

#[test]
fn blank_bridge_is_passed_through_across_conversations() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    convo.start(NodeRef::new(1, 0), hero()).expect("start");
    convo.advance().expect("menu");
    convo.choose(NodeRef::new(1, 4)).expect("ask for news");

    let frame = convo.advance().expect("bridge");
    assert_eq!(frame, text("Barkeep", "They say the {villain} walks the cellar at night."));
    assert_eq!(convo.active_key(), Some(&NodeRef::new(2, 1)));

    // The trailing group node has no links, so the conversation simply ends.
    assert_eq!(convo.advance().expect("end"), Frame::Ended);
}

#[test]
fn starting_on_a_bridge_or_root_never_presents_it() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);

    convo.start(NodeRef::new(1, 7), None).expect("start at bridge");
    assert_eq!(convo.active_key(), Some(&NodeRef::new(2, 1)));

    convo.start(NodeRef::new(2, 0), None).expect("start at root");
    assert_eq!(convo.active_key(), Some(&NodeRef::new(2, 1)));
}

#[test]
fn leaf_choice_without_links_ends_after_its_line() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    convo.start(NodeRef::new(1, 0), None).expect("start");
    convo.advance().expect("menu");

    assert_eq!(convo.choose(NodeRef::new(1, 5)).expect("leave"), text("{hero}", "Never mind."));
    assert_eq!(convo.advance().expect("end"), Frame::Ended);
}

#[test]
fn unoffered_choice_is_rejected_without_moving() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    convo.start(NodeRef::new(1, 0), hero()).expect("start");

    assert!(matches!(convo.choose(NodeRef::new(1, 3)), Err(DialogError::InvalidChoice(_))));
    assert_eq!(convo.active_key(), Some(&NodeRef::new(1, 1)));

    let menu = convo.advance().expect("menu");
    assert!(matches!(
        convo.choose(NodeRef::new(1, 6)),
        Err(DialogError::InvalidChoice(id)) if id == "1:6"
    ));
    assert_eq!(convo.current_frame(), menu);
    assert_eq!(convo.offered_choices().len(), 3);
}

#[test]
fn missing_start_node_is_reported() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    let result = convo.start(NodeRef::new(9, 9), None);
    assert!(matches!(result, Err(DialogError::NodeNotFound(node)) if node == NodeRef::new(9, 9)));
    assert!(convo.is_ended());
}

#[test]
fn overrides_merge_mid_conversation() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    convo.start(NodeRef::new(1, 0), hero()).expect("start");
    convo.advance().expect("menu");
    convo.choose(NodeRef::new(1, 4)).expect("ask");
    convo.apply_overrides(WordOverrides::new().with("villain", "Grey Widow"));

    let frame = convo.advance().expect("rumour");
    assert_eq!(frame, text("Barkeep", "They say the Grey Widow walks the cellar at night."));
    assert_eq!(convo.overrides().get("hero"), Some("Aria"));
}

#[test]
fn configured_line_break_is_used() {
    let doc = tavern();
    let config = EngineConfig::default().with_line_break(" / ");
    let mut convo = Conversation::with_config(&doc, config);
    let frame = convo.start(NodeRef::new(1, 1), hero()).expect("start");
    assert_eq!(frame, text("Barkeep", "Evening, Aria. / What'll it be?"));
}

#[test]
fn conversations_share_one_document() {
    let doc = tavern();
    let mut first = Conversation::new(&doc);
    let mut second = Conversation::new(&doc);
    first.start(NodeRef::new(1, 0), None).expect("first");
    second.start(NodeRef::new(2, 0), None).expect("second");
    first.advance().expect("first menu");

    assert_eq!(first.state(), ConversationState::PresentingChoices);
    assert_eq!(second.active_key(), Some(&NodeRef::new(2, 1)));
}

#[test]
fn choices_frame_serializes_with_kind_tag() {
    let doc = tavern();
    let mut convo = Conversation::new(&doc);
    convo.start(NodeRef::new(1, 0), None).expect("start");
    let json = serde_json::to_value(convo.advance().expect("menu")).expect("serializes");

    assert_eq!(json["kind"], "choices");
    assert_eq!(json["options"][0]["id"]["conversation_id"], 1);
    assert_eq!(json["options"][0]["id"]["node_id"], 3);
    assert_eq!(json["options"][2]["label"], "Leave");
}

#[test]
fn redirect_cycle_fails_instead_of_hanging() {
    let src = r#"{
        "Title": "Loop", "Version": "1", "Author": "", "Description": "", "UserScript": "",
        "Assets": { "Actors": [], "Items": [], "Locations": [], "UserVariables": [],
            "Conversations": [{ "ID": 1, "Fields": {}, "DialogNodes": [
                { "ID": 1, "Fields": {"Dialogue Text": ""},
                  "OutgoingLinks": [{"OriginConvoID": 1, "OriginDialogID": 1, "DestinationConvoID": 1, "DestinationDialogID": 2}] },
                { "ID": 2, "Fields": {"Dialogue Text": ""},
                  "OutgoingLinks": [{"OriginConvoID": 1, "OriginDialogID": 2, "DestinationConvoID": 1, "DestinationDialogID": 1}] }
            ]}]
        }
    }"#;
    let doc = ChatMapDocument::from_json_str(src).expect("loads");
    let mut convo = Conversation::with_config(&doc, EngineConfig::default().with_max_redirects(4));
    assert!(matches!(
        convo.start(NodeRef::new(1, 1), None),
        Err(DialogError::RedirectLoop { hops: 4, .. })
    ));
}

#[test]
fn menu_link_to_missing_node_fails_the_step() {
    let src = r#"{
        "Title": "Broken", "Version": "1", "Author": "", "Description": "", "UserScript": "",
        "Assets": { "Actors": [], "Items": [], "Locations": [], "UserVariables": [],
            "Conversations": [{ "ID": 1, "Fields": {}, "DialogNodes": [
                { "ID": 1, "Fields": {"Dialogue Text": "Hello."},
                  "OutgoingLinks": [{"OriginConvoID": 1, "OriginDialogID": 1, "DestinationConvoID": 1, "DestinationDialogID": 2}] },
                { "ID": 2, "IsGroup": true, "Fields": {},
                  "OutgoingLinks": [{"OriginConvoID": 1, "OriginDialogID": 2, "DestinationConvoID": 1, "DestinationDialogID": 42}] }
            ]}]
        }
    }"#;
    let doc = ChatMapDocument::from_json_str(src).expect("loads despite the dangling link");
    let mut convo = Conversation::new(&doc);
    convo.start(NodeRef::new(1, 1), None).expect("start");

    assert!(matches!(convo.advance(), Err(DialogError::NodeNotFound(node)) if node == NodeRef::new(1, 42)));
    assert_eq!(convo.active_key(), Some(&NodeRef::new(1, 1)));
}

const BRANCHES: &str = r#"{
    "Title": "Branches", "Version": "1", "Author": "", "Description": "", "UserScript": "",
    "Assets": { "Actors": [], "Items": [], "Locations": [], "UserVariables": [],
        "Conversations": [{ "ID": 1, "Fields": {"Title": "Fork"}, "DialogNodes": [
            { "ID": 0, "IsRoot": true, "Fields": {"Title": "START"},
              "OutgoingLinks": [{"OriginConvoID": 1, "OriginDialogID": 0, "DestinationConvoID": 1, "DestinationDialogID": 1}] },
            { "ID": 1, "IsGroup": true, "Fields": {"Title": "Fork"},
              "OutgoingLinks": [
                {"OriginConvoID": 1, "OriginDialogID": 1, "DestinationConvoID": 1, "DestinationDialogID": 2},
                {"OriginConvoID": 1, "OriginDialogID": 1, "DestinationConvoID": 1, "DestinationDialogID": 3},
                {"OriginConvoID": 1, "OriginDialogID": 1, "DestinationConvoID": 1, "DestinationDialogID": 4}
              ] },
            { "ID": 2, "IsGroup": true, "Fields": {"Menu Text": "Go deeper"},
              "OutgoingLinks": [{"OriginConvoID": 1, "OriginDialogID": 2, "DestinationConvoID": 1, "DestinationDialogID": 5}] },
            { "ID": 3, "Fields": {"Menu Text": "Walk away", "Dialogue Text": ""}, "OutgoingLinks": [] },
            { "ID": 4, "Fields": {"Menu Text": "Skip ahead", "Dialogue Text": ""},
              "OutgoingLinks": [{"OriginConvoID": 1, "OriginDialogID": 4, "DestinationConvoID": 1, "DestinationDialogID": 5}] },
            { "ID": 5, "Fields": {"Dialogue Text": "Deep"}, "OutgoingLinks": [] }
        ]}]
    }
}"#;

fn branches() -> ChatMapDocument {
    ChatMapDocument::from_json_str(BRANCHES).expect("branches loads")
}

fn open_fork(doc: &ChatMapDocument) -> Conversation<'_, ChatMapDocument> {
    let mut convo = Conversation::new(doc);
    let frame = convo.start(NodeRef::new(1, 0), None).expect("start");
    assert_eq!(
        frame,
        Frame::Choices {
            options: vec![
                ChoiceOption::new(NodeRef::new(1, 2), "Go deeper"),
                ChoiceOption::new(NodeRef::new(1, 3), "Walk away"),
                ChoiceOption::new(NodeRef::new(1, 4), "Skip ahead"),
            ],
        }
    );
    convo
}

#[test]
fn choosing_a_group_opens_its_menu() {
    let doc = branches();
    let mut convo = open_fork(&doc);

    let frame = convo.choose(NodeRef::new(1, 2)).expect("nested menu");
    assert_eq!(
        frame,
        Frame::Choices {
            options: vec![ChoiceOption::new(NodeRef::new(1, 5), "Deep")],
        }
    );
    assert_eq!(convo.state(), ConversationState::PresentingChoices);
    assert_eq!(convo.active_key(), Some(&NodeRef::new(1, 2)));
}

#[test]
fn choosing_a_blank_dead_end_ends() {
    let doc = branches();
    let mut convo = open_fork(&doc);

    assert_eq!(convo.choose(NodeRef::new(1, 3)).expect("walk away"), Frame::Ended);
    assert!(convo.is_ended());
    assert!(matches!(convo.advance(), Err(DialogError::ConversationEnded)));
}

#[test]
fn choosing_a_blank_bridge_lands_past_it() {
    let doc = branches();
    let mut convo = open_fork(&doc);

    let frame = convo.choose(NodeRef::new(1, 4)).expect("skip ahead");
    assert_eq!(
        frame,
        Frame::Text {
            speaker: None,
            line: "Deep".into(),
        }
    );
    assert_eq!(convo.active_key(), Some(&NodeRef::new(1, 5)));
}
