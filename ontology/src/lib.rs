// Life of an OBO line:
// 1. Physical lines are joined across trailing-backslash continuations
// 2. Sanitize: cut the `!` comment and trailing `{...}` modifier
// 3. Tokenize into `name: value`
// 4. Dispatch the tag into the stanza being built
// 5. On the next `[Header]` (or end of input) the stanza is flushed:
//     - Bulk load: into the ontology's term, name and stanza tables;
//       cross references are validated once the whole file is in
//     - Stream read: the one term is handed to the query filter
//
// System components:
//  - Line sanitizer and tokenizer (parse)
//  - Whole-file loader and validator (store)
//  - Incremental reader, formats, queries and list expansion (stream)

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod parse;
pub mod store;
pub mod stream;
pub mod types;

mod e2e_tests;
#[cfg(test)]
mod simulation;
#[cfg(test)]
mod testing;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use store::{LoadError, Ontology, ValidationToggles};
pub use stream::{StreamError, TermReader};
pub use types::{Tag, Term};
