//! Incremental, query-filtered reading of terms.
//!
//! ```ignore
//! use ontology::stream::TermReader;
//! use ontology::types::Term;
//!
//! let mut reader = TermReader::open_files("go.obo:nam=nucle*")?;
//! let mut term = Term::new();
//! while reader.read_next(&mut term)? {
//!     println!("{} {}", term.id, term.name.as_deref().unwrap_or(""));
//! }
//! ```
//!
//! Sources come from an [`AccessMethod`]; a query may also name a list file
//! of further queries (`@file` or `list:file`), expanded depth-first up to
//! [`crate::constants::MAX_LIST_DEPTH`] levels.

pub mod access;
pub mod format;
pub mod list;
pub mod query;
pub mod reader;
pub mod source;
pub mod wildcard;

pub use access::{AccessMethod, FileAccess, MemoryAccess};
pub use format::{Format, REGISTERED_FORMATS, ReadError};
pub use list::QueryListNode;
pub use query::{FieldQuery, Query, QueryError, QueryField, QuerySpec, QueryTarget};
pub use reader::{StreamError, StreamSession, TermReader};
pub use source::{BufferedSource, Checkpoint, LineSource};
pub use wildcard::Wildcard;
