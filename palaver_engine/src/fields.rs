//! Field bags for the loosely-typed records of a node-graph export.
//!
//! Actors, items, locations and user variables carry arbitrary `Fields`
//! dictionaries whose keys use whatever casing the authoring tool chose
//! ("Dialogue Text", "DialogueText", "IsPlayer"). Keys are normalized once at
//! load time so callers can address them uniformly.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use palaver_data::{FieldValue, RawFields};
use regex::Regex;

/// The normalized keys the engine itself reads.
pub mod keys {
    pub const NAME: &str = "name";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const ACTOR: &str = "actor";
    pub const CONVERSANT: &str = "conversant";
    pub const MENU_TEXT: &str = "menu_text";
    pub const DIALOGUE_TEXT: &str = "dialogue_text";
    pub const IS_PLAYER: &str = "is_player";
    pub const INITIAL_VALUE: &str = "initial_value";
}

static FIRST_CAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
static ALL_CAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert an authoring-tool key into its canonical `lower_snake` form.
///
/// ```
/// use palaver_engine::fields::normalize_field_name;
///
/// assert_eq!(normalize_field_name("Dialogue Text"), "dialogue_text");
/// assert_eq!(normalize_field_name("DialogueText"), "dialogue_text");
/// assert_eq!(normalize_field_name("OriginConvoID"), "origin_convo_id");
/// ```
pub fn normalize_field_name(name: &str) -> String {
    let compact = name.replace(' ', "");
    let split_words = FIRST_CAP.replace_all(&compact, "${1}_${2}");
    ALL_CAP.replace_all(&split_words, "${1}_${2}").to_lowercase()
}

/// Strings consisting only of decimal digits become integers.
pub fn coerce_field_value(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            match text.parse::<i64>() {
                Ok(n) => FieldValue::Integer(n),
                Err(_) => FieldValue::Text(text),
            }
        },
        other => other,
    }
}

/// Normalized key -> value mapping for a single record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBag(BTreeMap<String, FieldValue>);

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from raw export fields, normalizing keys and coercing digit strings.
    pub fn from_raw(raw: &RawFields) -> Self {
        Self(
            raw.iter()
                .map(|(key, value)| (normalize_field_name(key), coerce_field_value(value.clone())))
                .collect(),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Text form of a field; integers and floats are rendered back to strings.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            FieldValue::Null => None,
            FieldValue::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            FieldValue::Boolean(b) => Some(*b),
            FieldValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            FieldValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
