//! Hypertext dialogue documents and their embedded markup.
//!
//! # Markup
//! - `<<...>>` variable/macro tags are stripped from the presented text.
//! - `[[target]]` and `[[Display text|target]]` are choice links. They are
//!   stripped from the text and collected, in document order, as choices.
//! - A blank line separates paragraphs; each paragraph is one text segment.
//!
//! Parsing is a pure function of the entry's raw text. Nothing here tracks a
//! reading position; that belongs to the conversation engine.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use palaver_data::FieldValue;
use regex::Regex;

use crate::error::{DialogError, DialogResult};
use crate::source::{Beat, ChoiceOption, Continuation, DialogSource};

static VARIABLE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<<.*?>>").expect("valid regex"));
static CHOICE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("valid regex"));
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\r?\n[ \t]*){2,}").expect("valid regex"));

/// One titled passage as it appears in the export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TwineEntry {
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
    pub created: FieldValue,
    pub modified: FieldValue,
    pub modifier: FieldValue,
}

/// Presentable form of an entry, derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTwineNode {
    pub text_segments: Vec<String>,
    /// Destination title -> display text, in order of first appearance.
    pub choices: Vec<ChoiceOption<String>>,
}

impl ParsedTwineNode {
    pub fn choice_label(&self, destination: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|c| c.id == destination)
            .map(|c| c.label.as_str())
    }
}

/// Strip markup from `text` and collect its choice links.
///
/// # Errors
/// `MalformedChoiceSyntax` when a link is empty or has more than one `|`.
///
/// ```
/// use palaver_engine::twine::parse_text;
///
/// let node = parse_text("<<$visited=true>>You enter.\n\n[[Leave|exit]]").unwrap();
/// assert_eq!(node.text_segments, vec!["You enter."]);
/// assert_eq!(node.choice_label("exit"), Some("Leave"));
/// ```
pub fn parse_text(text: &str) -> DialogResult<ParsedTwineNode> {
    let without_variables = VARIABLE_TAG.replace_all(text, "");
    let without_choices = CHOICE_LINK.replace_all(without_variables.trim(), "");
    let remaining = without_choices.trim();

    let text_segments = if remaining.is_empty() {
        Vec::new()
    } else {
        PARAGRAPH_BREAK
            .split(remaining)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    };

    Ok(ParsedTwineNode {
        text_segments,
        choices: parse_choices(text)?,
    })
}

/// Collect every `[[...]]` link in `text`, in order. A repeated destination keeps
/// its first position and takes the later label.
///
/// # Errors
/// `MalformedChoiceSyntax` when a link is empty or has more than one `|`.
pub fn parse_choices(text: &str) -> DialogResult<Vec<ChoiceOption<String>>> {
    let mut choices: Vec<ChoiceOption<String>> = Vec::new();

    for capture in CHOICE_LINK.captures_iter(text) {
        let inner = &capture[1];
        let (label, destination) = match inner.split('|').collect::<Vec<_>>()[..] {
            [only] => (only.trim(), only.trim()),
            [label, destination] => (label.trim(), destination.trim()),
            _ => return Err(DialogError::MalformedChoiceSyntax(inner.to_string())),
        };
        if destination.is_empty() {
            return Err(DialogError::MalformedChoiceSyntax(inner.to_string()));
        }

        if let Some(existing) = choices.iter_mut().find(|c| c.id == destination) {
            existing.label = label.to_string();
        } else {
            choices.push(ChoiceOption::new(destination.to_string(), label));
        }
    }

    Ok(choices)
}

/// Immutable collection of entries keyed by title.
#[derive(Debug, Clone, Default)]
pub struct TwineDocument {
    entries: HashMap<String, TwineEntry>,
    order: Vec<String>,
}

impl TwineDocument {
    /// Build a document from entries in export order. A repeated title replaces
    /// the earlier entry but keeps its position.
    pub fn from_entries(entries: impl IntoIterator<Item = TwineEntry>) -> Self {
        let mut doc = Self::default();
        for entry in entries {
            if !doc.entries.contains_key(&entry.title) {
                doc.order.push(entry.title.clone());
            }
            doc.entries.insert(entry.title.clone(), entry);
        }
        doc
    }

    /// Parse a hypertext export held in memory.
    ///
    /// # Errors
    /// `MalformedDocument` if the JSON is invalid or an entry lacks `title`/`text`.
    pub fn from_json_str(src: &str) -> DialogResult<Self> {
        let def = serde_json::from_str(src)?;
        Ok(crate::loader::build_twine(def))
    }

    pub(crate) fn from_json_value(value: serde_json::Value) -> DialogResult<Self> {
        let def = serde_json::from_value(value)?;
        Ok(crate::loader::build_twine(def))
    }

    /// Read a hypertext export from disk.
    ///
    /// # Errors
    /// `Io` if unreadable, `MalformedDocument` if it does not parse.
    pub fn load(path: &Path) -> DialogResult<Self> {
        crate::loader::load_twine(path)
    }

    pub fn entry(&self, title: &str) -> Option<&TwineEntry> {
        self.entries.get(title)
    }

    /// Titles in export order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn first_title(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Parse the entry titled `title`.
    ///
    /// # Errors
    /// `EntryNotFound` if there is no such entry; otherwise as [`parse_text`].
    pub fn parse_node(&self, title: &str) -> DialogResult<ParsedTwineNode> {
        let entry = self
            .entry(title)
            .ok_or_else(|| DialogError::EntryNotFound(title.to_string()))?;
        parse_text(&entry.text)
    }

    /// Choice destinations that name no entry in this document.
    pub fn dangling_links(&self) -> Vec<(String, String)> {
        let mut dangling = Vec::new();
        for title in &self.order {
            let Some(entry) = self.entries.get(title) else { continue };
            let Ok(choices) = parse_choices(&entry.text) else { continue };
            for choice in choices {
                if !self.entries.contains_key(&choice.id) {
                    dangling.push((title.clone(), choice.id));
                }
            }
        }
        dangling
    }
}

impl DialogSource for TwineDocument {
    type Key = String;

    fn resolve(&self, key: &String) -> DialogResult<Beat<String>> {
        let parsed = self.parse_node(key)?;
        let then = if parsed.choices.is_empty() {
            Continuation::End
        } else {
            Continuation::Menu(parsed.choices)
        };
        Ok(Beat {
            key: key.clone(),
            speaker: None,
            segments: parsed.text_segments,
            then,
        })
    }
}
