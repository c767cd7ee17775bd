//! OBO text parsing, shared by the whole-file loader and the stream reader.
//!
//! Layers, leaves first:
//! - `sanitize` - comments, modifiers, escapes and continuation lines
//! - `tokenize` - `name: value` splitting
//! - `definition` - quoted `def` values and their dbxref lists
//! - `builder` - per-tag dispatch into terms and generic stanzas

pub mod builder;
pub mod definition;
pub mod sanitize;
pub mod tokenize;

pub use builder::{
    BuildMode, GenericStanza, NameKey, Stanza, StanzaBuilder, StanzaKind, StanzaOrder, TagLine,
    TermExtras, apply_term_tag, parse_tag_line,
};
pub use definition::{Definition, DefinitionError, parse_definition, parse_quoted};
pub use sanitize::{
    BracketCut, LogicalLine, LogicalLines, Sanitized, Stripped, cut_comment, cut_dbxref,
    cut_modifier, header_name, join_continuations, sanitize, strip, unescape,
};
pub use tokenize::{Tokenized, tokenize};
