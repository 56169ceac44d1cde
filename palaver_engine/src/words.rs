//! Placeholder substitution for dialogue text.
//!
//! Authors write `{name}` placeholders; the caller supplies replacement words
//! when a conversation starts. Unmapped placeholders stay as literal text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid regex"));

/// Marker authors use for a line break inside a single line of dialogue.
pub const LINE_BREAK_MARKER: char = '|';

/// Placeholder name -> replacement word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordOverrides(HashMap<String, String>);

impl WordOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, word: impl Into<String>) -> Self {
        self.insert(name, word);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, word: impl Into<String>) {
        self.0.insert(name.into(), word.into());
    }

    /// Add every entry of `other`, replacing words for names already present.
    pub fn merge(&mut self, other: WordOverrides) {
        self.0.extend(other.0);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace every mapped `{name}` in `text`. Replacement words are not re-scanned.
    pub fn apply(&self, text: &str) -> String {
        if self.0.is_empty() {
            return text.to_string();
        }
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| match self.0.get(&caps[1]) {
                Some(word) => word.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for WordOverrides {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for WordOverrides {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

/// Substitute placeholders, then turn every `|` into `line_break`.
pub fn render_line(text: &str, overrides: &WordOverrides, line_break: &str) -> String {
    overrides
        .apply(text)
        .replace(LINE_BREAK_MARKER, line_break)
}
