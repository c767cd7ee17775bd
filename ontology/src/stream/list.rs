//! Query list files.
//!
//! A list file holds one query per line. Blank lines and `#` comments are
//! skipped, and only the first whitespace-separated token of a line is used.

use std::io;

use crate::stream::format::Format;
use crate::stream::query::FieldQuery;
use crate::stream::source::LineSource;

/// A pending list entry with the reader context saved when it was queued.
#[derive(Debug, Clone)]
pub struct QueryListNode {
    pub query: String,
    pub format: Option<Format>,
    pub format_name: Option<String>,
    /// Byte offset at which reading of the entry's source resumes.
    pub offset: u64,
    pub fields: Vec<FieldQuery>,
}

impl QueryListNode {
    /// A top-level query with no inherited context.
    #[must_use]
    pub fn root(query: &str) -> Self {
        Self {
            query: query.to_owned(),
            format: None,
            format_name: None,
            offset: 0,
            fields: Vec::new(),
        }
    }
}

/// Read the entries of a list file.
pub fn read_list(source: &mut dyn LineSource) -> io::Result<Vec<String>> {
    let mut entries = Vec::new();
    let mut line = String::new();
    while source.read_line(&mut line)? {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(token) = trimmed.split_whitespace().next() {
            entries.push(token.to_owned());
        }
    }
    Ok(entries)
}
