//! The conversation cursor.
//!
//! A [`Conversation`] walks a [`DialogSource`] one player-visible beat at a
//! time. At any moment it is in exactly one of three states:
//!
//! - presenting a line of text (`advance` moves on),
//! - presenting a menu of choices (`choose` picks one),
//! - ended (only `start` leaves this state).
//!
//! Root headers and blank bridge nodes are never presented; the cursor passes
//! through them until it lands on text, a menu, or the end of the graph.

use std::fmt;

use log::{debug, trace};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{DialogError, DialogResult};
use crate::source::{Beat, ChoiceOption, Continuation, DialogSource};
use crate::words::{WordOverrides, render_line};

/// Observable state of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    PresentingText,
    PresentingChoices,
    Ended,
}

/// The presentable output of one traversal step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame<K> {
    Text { speaker: Option<String>, line: String },
    Choices { options: Vec<ChoiceOption<K>> },
    Ended,
}

impl<K> Frame<K> {
    pub fn is_ended(&self) -> bool {
        matches!(self, Frame::Ended)
    }
}

#[derive(Debug, Clone)]
struct Cursor<K> {
    beat: Beat<K>,
    /// Index into `beat.segments`; equal to its length while a menu is shown.
    text_index: usize,
}

impl<K> Cursor<K> {
    /// A beat with no segments opens straight onto its menu.
    fn new(beat: Beat<K>) -> Self {
        Self { beat, text_index: 0 }
    }

    fn in_menu(&self) -> bool {
        self.text_index >= self.beat.segments.len()
    }
}

/// What `advance` does once the current segment has been shown.
enum Step<K> {
    NextSegment,
    ShowMenu,
    End,
    Follow(K),
}

/// Cursor-driven traversal of one conversation over a borrowed document.
pub struct Conversation<'a, S: DialogSource + ?Sized> {
    source: &'a S,
    config: EngineConfig,
    overrides: WordOverrides,
    cursor: Option<Cursor<S::Key>>,
}

impl<S: DialogSource + ?Sized> fmt::Debug for Conversation<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversation")
            .field("active", &self.active_key())
            .field("text_cursor", &self.text_cursor())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<'a, S: DialogSource + ?Sized> Conversation<'a, S> {
    /// A conversation over `source` with default settings. It starts out ended.
    pub fn new(source: &'a S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: &'a S, config: EngineConfig) -> Self {
        Self {
            source,
            config,
            overrides: WordOverrides::new(),
            cursor: None,
        }
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn overrides(&self) -> &WordOverrides {
        &self.overrides
    }

    /// Move the cursor to `entry` and compute the first frame.
    ///
    /// `Some(overrides)` replaces the installed words; `None` keeps them.
    /// On error the conversation is left exactly as it was.
    ///
    /// # Errors
    /// Lookup failures for the entry or any node passed through on the way in.
    pub fn start(
        &mut self,
        entry: impl Into<S::Key>,
        overrides: Option<WordOverrides>,
    ) -> DialogResult<Frame<S::Key>> {
        let entry = entry.into();
        debug!("starting conversation at {entry}");
        let landed = self.land(entry)?;
        if let Some(overrides) = overrides {
            self.overrides = overrides;
        }
        self.cursor = landed.map(Cursor::new);
        Ok(self.current_frame())
    }

    /// Add words to the installed overrides without moving the cursor.
    pub fn apply_overrides(&mut self, overrides: WordOverrides) {
        self.overrides.merge(overrides);
    }

    pub fn state(&self) -> ConversationState {
        match &self.cursor {
            None => ConversationState::Ended,
            Some(cursor) if !cursor.in_menu() => ConversationState::PresentingText,
            Some(cursor) => match cursor.beat.then {
                Continuation::Menu(_) => ConversationState::PresentingChoices,
                _ => ConversationState::Ended,
            },
        }
    }

    pub fn is_ended(&self) -> bool {
        self.state() == ConversationState::Ended
    }

    /// Address of the node currently presented.
    pub fn active_key(&self) -> Option<&S::Key> {
        self.cursor.as_ref().map(|c| &c.beat.key)
    }

    /// Index of the presented text segment, while presenting text.
    pub fn text_cursor(&self) -> Option<usize> {
        self.cursor.as_ref().filter(|c| !c.in_menu()).map(|c| c.text_index)
    }

    /// Menu currently on offer, with unrendered labels. Empty unless presenting choices.
    pub fn offered_choices(&self) -> &[ChoiceOption<S::Key>] {
        match &self.cursor {
            Some(cursor) if cursor.in_menu() => match &cursor.beat.then {
                Continuation::Menu(options) => options,
                _ => &[],
            },
            _ => &[],
        }
    }

    /// The frame for the current position. Never changes state.
    pub fn current_frame(&self) -> Frame<S::Key> {
        let Some(cursor) = &self.cursor else {
            return Frame::Ended;
        };
        if let Some(segment) = cursor.beat.segments.get(cursor.text_index) {
            return Frame::Text {
                speaker: cursor.beat.speaker.as_deref().map(|name| self.overrides.apply(name)),
                line: self.render(segment),
            };
        }
        match &cursor.beat.then {
            Continuation::Menu(options) => Frame::Choices {
                options: options
                    .iter()
                    .map(|opt| ChoiceOption::new(opt.id.clone(), self.render(&opt.label)))
                    .collect(),
            },
            _ => Frame::Ended,
        }
    }

    /// Show the next segment, or move past the current node.
    ///
    /// # Errors
    /// - `ConversationEnded` if there is nothing to advance.
    /// - `AwaitingChoice` while a menu is shown.
    /// - Lookup failures while moving to the next node; the cursor is left unchanged.
    pub fn advance(&mut self) -> DialogResult<Frame<S::Key>> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Err(DialogError::ConversationEnded);
        };
        if cursor.in_menu() {
            return Err(DialogError::AwaitingChoice);
        }

        let step = if cursor.text_index + 1 < cursor.beat.segments.len() {
            Step::NextSegment
        } else {
            match &cursor.beat.then {
                Continuation::End => Step::End,
                Continuation::Menu(_) => Step::ShowMenu,
                Continuation::Follow(next) => Step::Follow(next.clone()),
            }
        };

        match step {
            Step::NextSegment => cursor.text_index += 1,
            Step::ShowMenu => {
                trace!("{} exhausted, showing its menu", cursor.beat.key);
                cursor.text_index = cursor.beat.segments.len();
            },
            Step::End => {
                debug!("conversation ended after {}", cursor.beat.key);
                self.cursor = None;
            },
            Step::Follow(next) => {
                trace!("{} exhausted, following to {next}", cursor.beat.key);
                let landed = self.land(next)?;
                self.cursor = landed.map(Cursor::new);
            },
        }
        Ok(self.current_frame())
    }

    /// Pick one of the offered choices.
    ///
    /// # Errors
    /// - `InvalidChoice` if no menu is shown or `id` is not on it; state is unchanged.
    /// - Lookup failures while landing on the chosen node; state is unchanged.
    pub fn choose(&mut self, id: impl Into<S::Key>) -> DialogResult<Frame<S::Key>> {
        let id = id.into();
        if !self.offered_choices().iter().any(|opt| opt.id == id) {
            return Err(DialogError::InvalidChoice(id.to_string()));
        }
        debug!("choice {id} picked");
        let landed = self.land(id)?;
        self.cursor = landed.map(Cursor::new);
        Ok(self.current_frame())
    }

    fn render(&self, text: &str) -> String {
        render_line(text, &self.overrides, &self.config.line_break)
    }

    /// Resolve `key`, passing through roots and blank bridges. `None` means the graph ends here.
    fn land(&self, key: S::Key) -> DialogResult<Option<Beat<S::Key>>> {
        let start = key.to_string();
        let mut key = key;
        for _ in 0..=self.config.max_redirects {
            let beat = self.source.resolve(&key)?;
            if !beat.is_pass_through() {
                trace!("landed on {key}");
                return Ok(Some(beat));
            }
            match beat.then {
                Continuation::Follow(next) => {
                    trace!("passing through {key} to {next}");
                    key = next;
                },
                _ => {
                    debug!("{key} leads nowhere, conversation ends");
                    return Ok(None);
                },
            }
        }
        Err(DialogError::RedirectLoop {
            start,
            hops: self.config.max_redirects,
        })
    }
}
