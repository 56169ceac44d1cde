#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub const PALAVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// Documents and loading
pub mod chatmap;
pub mod fields;
pub mod loader;
pub mod source;
pub mod twine;

// Traversal
pub mod config;
pub mod conversation;
pub mod error;
pub mod words;

// Terminal front end
pub mod console;
pub mod data_paths;
pub mod style;

// Re-exports for convenience
pub use chatmap::{ChatMapDocument, NodeRef};
pub use config::{EngineConfig, load_config};
pub use conversation::{Conversation, ConversationState, Frame};
pub use error::{DialogError, DialogResult};
pub use loader::{load_chatmap, load_document, load_twine};
pub use source::{Beat, ChoiceOption, Continuation, DialogSource, Document, EntryPoint};
pub use twine::{ParsedTwineNode, TwineDocument};
pub use words::WordOverrides;
