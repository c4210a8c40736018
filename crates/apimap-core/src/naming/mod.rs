//! Pure string functions for deriving resource and operation names.
//!
//! Word lists (acronyms, invariants) come from a [`Lexicon`] passed in by
//! the caller; nothing here reads global state.

mod inflect;
mod words;

pub use crate::config::Lexicon;
pub use inflect::{is_plural, plural, singular};
pub use words::{capitalize, name_variants, split_words, to_camel_case, to_resource_name};
