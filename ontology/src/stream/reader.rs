//! Incremental term reader.
//!
//! A [`TermReader`] hands out one matching term per [`TermReader::read_next`]
//! call, refilling a caller-owned [`Term`] in place.
//!
//! # States
//!
//! - No format known: every registered format is trial-run from the same
//!   checkpoint. The first structural success locks that format. A stanza
//!   shaped like a format's record but missing its id also locks that format
//!   and is skipped.
//! - Format known: only that format is tried. Running out of input before a
//!   single record was read this session is fatal.
//!
//! When a source runs out, the next pending list entry is popped and opened
//! with the context saved when it was queued. A list entry that cannot be
//! opened, parsed or read in any format is recorded as a
//! [`DiagnosticKind::SkippedEntry`] and the entry after it is tried. Only the
//! top-level query and list nesting depth fail the stream.

use std::collections::VecDeque;
use std::fmt;
use std::io;

use crate::constants::MAX_LIST_DEPTH;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::stream::access::{AccessMethod, FileAccess};
use crate::stream::format::{Format, REGISTERED_FORMATS, ReadError};
use crate::stream::list::{QueryListNode, read_list};
use crate::stream::query::{Query, QueryError, QuerySpec, QueryTarget};
use crate::stream::source::{Checkpoint, LineSource};
use crate::types::Term;

/// Errors that end a stream.
#[derive(Debug)]
pub enum StreamError {
    InvalidQuery(QueryError),
    /// List files nested deeper than [`MAX_LIST_DEPTH`].
    ListTooDeep { list: String, depth: usize },
    /// The source ran out before any record was read.
    NoRecords { source_name: String },
    /// No registered format could read the source.
    UnknownFormat { source_name: String },
    /// The access method could not open a source or list.
    Open { target: String, error: io::Error },
    Io { source_name: String, error: io::Error },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidQuery(e) => write!(f, "invalid query: {e}"),
            Self::ListTooDeep { list, depth } => write!(
                f,
                "query list '{list}' nested too deep ({depth} levels, at most {MAX_LIST_DEPTH})"
            ),
            Self::NoRecords { source_name } => {
                write!(f, "no records read from {source_name}")
            }
            Self::UnknownFormat { source_name } => {
                write!(f, "no known format can read {source_name}")
            }
            Self::Open { target, error } => write!(f, "cannot open '{target}': {error}"),
            Self::Io { source_name, error } => {
                write!(f, "read error in {source_name}: {error}")
            }
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidQuery(e) => Some(e),
            Self::Open { error, .. } | Self::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<QueryError> for StreamError {
    fn from(e: QueryError) -> Self {
        Self::InvalidQuery(e)
    }
}

/// Per-stream state shared by every source a stream visits.
#[derive(Debug, Default)]
pub struct StreamSession {
    depth: usize,
    records: usize,
    scratch: String,
    diagnostics: Diagnostics,
}

impl StreamSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current list nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Records parsed so far, matching or not.
    #[must_use]
    pub const fn records(&self) -> usize {
        self.records
    }

    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn enter_list(&mut self, list: &str) -> Result<(), StreamError> {
        if self.depth >= MAX_LIST_DEPTH {
            return Err(StreamError::ListTooDeep {
                list: list.to_owned(),
                depth: self.depth + 1,
            });
        }
        self.depth += 1;
        Ok(())
    }

    const fn leave_list(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// The source currently being read.
struct ActiveSource {
    target: String,
    source: Box<dyn LineSource>,
    /// `read_next` calls served from this entry.
    calls: usize,
    /// Opened from a query list rather than the top-level query.
    listed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Matched,
    Mismatched,
    Skipped,
    Exhausted,
}

/// Streams terms matching a query.
pub struct TermReader {
    access: Box<dyn AccessMethod>,
    session: StreamSession,
    query: Query,
    format: Option<Format>,
    format_name: Option<String>,
    active: Option<ActiveSource>,
    pending: VecDeque<QueryListNode>,
}

impl TermReader {
    /// Parse `query` and position the stream on its first source.
    pub fn open(query: &str, access: Box<dyn AccessMethod>) -> Result<Self, StreamError> {
        let mut reader = Self {
            access,
            session: StreamSession::new(),
            query: Query::default(),
            format: None,
            format_name: None,
            active: None,
            pending: VecDeque::new(),
        };
        tracing::debug!(query, access = reader.access.name(), "opening term stream");
        reader.attempt(QueryListNode::root(query), false)?;
        Ok(reader)
    }

    /// Open a query whose sources are files.
    pub fn open_files(query: &str) -> Result<Self, StreamError> {
        Self::open(query, Box::new(FileAccess::new()))
    }

    pub const fn set_case_sensitive_id(&mut self, case_sensitive: bool) {
        self.query.case_sensitive_id = case_sensitive;
    }

    pub const fn set_prefiltered(&mut self, prefiltered: bool) {
        self.query.prefiltered = prefiltered;
    }

    #[must_use]
    pub const fn session(&self) -> &StreamSession {
        &self.session
    }

    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.session.diagnostics
    }

    /// The format in use, once known.
    #[must_use]
    pub const fn format(&self) -> Option<Format> {
        self.format
    }

    #[must_use]
    pub fn format_name(&self) -> Option<&str> {
        self.format_name.as_deref()
    }

    /// The source being read, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.source.source_name())
    }

    /// Queued list entries not yet opened.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Read the next matching term into `term`.
    ///
    /// Returns `Ok(false)` once every source is exhausted.
    pub fn read_next(&mut self, term: &mut Term) -> Result<bool, StreamError> {
        term.clear();
        loop {
            if self.active.is_none() && !self.next_pending()? {
                return Ok(false);
            }
            match self.read_from_active(term) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(error) => match self.active.take() {
                    Some(active) if active.listed && !matches!(error, StreamError::Io { .. }) => {
                        self.skip_entry(&active.target, &error);
                        term.clear();
                    }
                    _ => return Err(error),
                },
            }
            self.active = None;
        }
    }

    /// Pop queued entries until one opens a source.
    fn next_pending(&mut self) -> Result<bool, StreamError> {
        while let Some(node) = self.pending.pop_front() {
            let entry = node.query.clone();
            match self.attempt(node, true) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(error @ StreamError::ListTooDeep { .. }) => return Err(error),
                Err(error) => self.skip_entry(&entry, &error),
            }
        }
        Ok(false)
    }

    fn skip_entry(&mut self, entry: &str, error: &StreamError) {
        self.session.diagnostics.warn(
            DiagnosticKind::SkippedEntry,
            Location::at(entry, 0),
            format!("skipping list entry '{entry}': {error}"),
        );
    }

    /// Restore an entry's context and open it.
    fn attempt(&mut self, node: QueryListNode, listed: bool) -> Result<bool, StreamError> {
        let spec = QuerySpec::parse(&node.query)?;
        if spec.format.is_some() {
            self.format = spec.format;
            self.format_name = spec.format_name;
        } else {
            self.format = node.format;
            self.format_name = node.format_name;
        }

        match spec.target {
            QueryTarget::List(list) => {
                self.query.fields = node.fields;
                self.expand_list(&list)
            }
            QueryTarget::Source { source, fields } => {
                self.query.fields = if fields.is_empty() {
                    node.fields
                } else {
                    fields
                };
                self.open_source(source, node.offset, listed)
            }
        }
    }

    fn expand_list(&mut self, list: &str) -> Result<bool, StreamError> {
        self.session.enter_list(list)?;
        let opened = self.queue_list(list).and_then(|()| self.next_pending());
        self.session.leave_list();
        opened
    }

    /// Append the entries of `list` to the pending queue.
    fn queue_list(&mut self, list: &str) -> Result<(), StreamError> {
        let entries = self.fetch_list(list)?;
        tracing::debug!(
            list,
            entries = entries.len(),
            depth = self.session.depth,
            "expanding query list"
        );

        let offset = self
            .active
            .as_ref()
            .map_or(0, |active| active.source.checkpoint().offset);
        for entry in entries {
            self.pending.push_back(QueryListNode {
                query: entry,
                format: self.format,
                format_name: self.format_name.clone(),
                offset,
                fields: self.query.fields.clone(),
            });
        }
        Ok(())
    }

    fn fetch_list(&mut self, list: &str) -> Result<Vec<String>, StreamError> {
        let fetched = self.access.fetch(list).map_err(|error| StreamError::Open {
            target: list.to_owned(),
            error,
        })?;
        let Some(mut source) = fetched else {
            return Ok(Vec::new());
        };
        read_list(source.as_mut()).map_err(|error| StreamError::Io {
            source_name: list.to_owned(),
            error,
        })
    }

    fn open_source(&mut self, target: String, offset: u64, listed: bool) -> Result<bool, StreamError> {
        let fetched = self.access.fetch(&target).map_err(|error| StreamError::Open {
            target: target.clone(),
            error,
        })?;
        let Some(mut source) = fetched else {
            tracing::debug!(target = %target, "source has nothing to read");
            return Ok(false);
        };
        if offset > 0 {
            source
                .restore(Checkpoint { offset, line: 0 })
                .map_err(|error| StreamError::Io {
                    source_name: target.clone(),
                    error,
                })?;
        }
        tracing::debug!(source = source.source_name(), format = ?self.format, "reading source");
        self.active = Some(ActiveSource {
            target,
            source,
            calls: 0,
            listed,
        });
        Ok(true)
    }

    /// Replace a single-record source with its next record.
    fn refetch(&mut self) -> Result<bool, StreamError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(false);
        };
        let fetched = self
            .access
            .fetch(&active.target)
            .map_err(|error| StreamError::Open {
                target: active.target.clone(),
                error,
            })?;
        match fetched {
            Some(source) => {
                active.source = source;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Read until a matching term or the end of the active entry.
    fn read_from_active(&mut self, term: &mut Term) -> Result<bool, StreamError> {
        let single_record = self.access.single_record();
        let resumed = self.active.as_ref().is_some_and(|active| active.calls > 0);
        if single_record && resumed && !self.refetch()? {
            return Ok(false);
        }
        if let Some(active) = self.active.as_mut() {
            active.calls += 1;
        }

        loop {
            let outcome = match self.format {
                Some(format) => self.read_known(format, term)?,
                None => self.read_trial(term)?,
            };
            match outcome {
                Outcome::Matched => return Ok(true),
                Outcome::Mismatched | Outcome::Skipped => term.clear(),
                Outcome::Exhausted => {
                    if single_record && self.refetch()? {
                        term.clear();
                        continue;
                    }
                    return Ok(false);
                }
            }
        }
    }

    fn read_known(&mut self, format: Format, term: &mut Term) -> Result<Outcome, StreamError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(Outcome::Exhausted);
        };
        let session = &mut self.session;
        let result = format.try_read(
            active.source.as_mut(),
            term,
            &mut session.scratch,
            &mut session.diagnostics,
        );
        match result {
            Ok(()) => {
                session.records += 1;
                Ok(self.classify(term))
            }
            Err(ReadError::EndOfInput) => {
                let source_name = active.source.source_name().to_owned();
                if session.records == 0 {
                    return Err(StreamError::NoRecords { source_name });
                }
                tracing::debug!(source = %source_name, "end of file before end of data");
                Ok(Outcome::Exhausted)
            }
            Err(ReadError::Malformed(message)) => {
                let location = Location::at(active.source.source_name(), active.source.line_number());
                session
                    .diagnostics
                    .warn(DiagnosticKind::MalformedRecord, location, message);
                Ok(Outcome::Skipped)
            }
            Err(ReadError::Io(error)) => Err(StreamError::Io {
                source_name: active.source.source_name().to_owned(),
                error,
            }),
        }
    }

    fn read_trial(&mut self, term: &mut Term) -> Result<Outcome, StreamError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(Outcome::Exhausted);
        };
        let session = &mut self.session;
        let start = active.source.checkpoint();
        let mut malformed = None;

        for &format in REGISTERED_FORMATS.iter().filter(|format| format.auto_try()) {
            let result = format.try_read(
                active.source.as_mut(),
                term,
                &mut session.scratch,
                &mut session.diagnostics,
            );
            match result {
                Ok(()) => {
                    session.records += 1;
                    tracing::debug!(source = active.source.source_name(), format = %format, "format detected");
                    self.format = Some(format);
                    self.format_name = Some(format.name().to_owned());
                    return Ok(self.classify(term));
                }
                Err(ReadError::Io(error)) => {
                    return Err(StreamError::Io {
                        source_name: active.source.source_name().to_owned(),
                        error,
                    });
                }
                Err(ReadError::Malformed(message)) => {
                    if malformed.is_none() {
                        malformed = Some((format, active.source.checkpoint(), message));
                    }
                    term.clear();
                    rewind(active.source.as_mut(), start)?;
                }
                Err(ReadError::EndOfInput) => {
                    term.clear();
                    rewind(active.source.as_mut(), start)?;
                }
            }
        }

        if let Some((format, after, message)) = malformed {
            rewind(active.source.as_mut(), after)?;
            tracing::debug!(source = active.source.source_name(), format = %format, "format detected");
            self.format = Some(format);
            self.format_name = Some(format.name().to_owned());
            let location = Location::at(active.source.source_name(), active.source.line_number());
            session
                .diagnostics
                .warn(DiagnosticKind::MalformedRecord, location, message);
            return Ok(Outcome::Skipped);
        }

        if session.records == 0 {
            return Err(StreamError::UnknownFormat {
                source_name: active.source.source_name().to_owned(),
            });
        }
        Ok(Outcome::Exhausted)
    }

    fn classify(&self, term: &Term) -> Outcome {
        if self.query.matches(term) {
            Outcome::Matched
        } else {
            Outcome::Mismatched
        }
    }
}

fn rewind(source: &mut dyn LineSource, to: Checkpoint) -> Result<(), StreamError> {
    source.restore(to).map_err(|error| StreamError::Io {
        source_name: source.source_name().to_owned(),
        error,
    })
}
