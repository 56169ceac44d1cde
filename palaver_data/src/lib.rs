//! Shared raw data model for the dialogue exports consumed by palaver_engine.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_chatmap, validate_twine};
