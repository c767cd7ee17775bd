//! Query parsing and term matching.
//!
//! ```text
//! query     := [format "::"] ( "@" listfile | "list:" listfile | source [":" selector] )
//! selector  := [fields "="] pattern
//! fields    := field ("|" field)*
//! ```
//!
//! A selector without fields applies to `id` and `acc`.

use std::fmt;

use crate::stream::format::Format;
use crate::stream::wildcard::Wildcard;
use crate::types::Term;

/// A term field a query can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    /// The term id, case sensitivity set by the query.
    Id,
    /// The term id, always case-insensitive.
    Acc,
    /// The term name.
    Nam,
    /// Any word of the definition.
    Des,
}

impl QueryField {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "acc" => Some(Self::Acc),
            "nam" => Some(Self::Nam),
            "des" => Some(Self::Des),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Acc => "acc",
            Self::Nam => "nam",
            Self::Des => "des",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(field, pattern)` pair.
#[derive(Debug, Clone)]
pub struct FieldQuery {
    pub field: QueryField,
    pub wildcard: Wildcard,
}

impl FieldQuery {
    pub fn new(field: QueryField, pattern: &str) -> Result<Self, QueryError> {
        let wildcard = Wildcard::new(pattern).map_err(|source| QueryError::BadPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self { field, wildcard })
    }
}

/// Errors in a query string.
#[derive(Debug)]
pub enum QueryError {
    Empty,
    UnknownFormat(String),
    UnknownField(String),
    MissingSource,
    MissingListFile,
    BadPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty query"),
            Self::UnknownFormat(name) => write!(f, "unknown format '{name}'"),
            Self::UnknownField(name) => write!(f, "unknown query field '{name}'"),
            Self::MissingSource => write!(f, "query names no source"),
            Self::MissingListFile => write!(f, "list query names no list file"),
            Self::BadPattern { pattern, source } => {
                write!(f, "bad wildcard pattern '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A term filter.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub fields: Vec<FieldQuery>,
    /// Whether `id` patterns match case-sensitively.
    pub case_sensitive_id: bool,
    /// The source already filtered its records; accept everything.
    pub prefiltered: bool,
}

impl Query {
    #[must_use]
    pub fn new(fields: Vec<FieldQuery>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Test a term against the query.
    ///
    /// Fields are tried in order and the first match accepts. A `des` field
    /// reached while the term has no definition rejects outright.
    #[must_use]
    pub fn matches(&self, term: &Term) -> bool {
        if self.prefiltered || self.fields.is_empty() {
            return true;
        }
        for query in &self.fields {
            let hit = match query.field {
                QueryField::Id => query.wildcard.matches(&term.id, self.case_sensitive_id),
                QueryField::Acc => query.wildcard.matches(&term.id, false),
                QueryField::Nam => term
                    .name
                    .as_deref()
                    .is_some_and(|name| query.wildcard.matches(name, false)),
                QueryField::Des => match term.def.as_deref() {
                    Some(def) if !def.is_empty() => query.wildcard.matches_any_word(def),
                    _ => return false,
                },
            };
            if hit {
                return true;
            }
        }
        false
    }
}

/// What a query reads.
#[derive(Debug, Clone)]
pub enum QueryTarget {
    /// A file of further queries.
    List(String),
    /// A source of records, filtered by `fields`.
    Source {
        source: String,
        fields: Vec<FieldQuery>,
    },
}

/// A parsed query string.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub format: Option<Format>,
    pub format_name: Option<String>,
    pub target: QueryTarget,
}

impl QuerySpec {
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::Empty);
        }

        let (format_name, rest) = split_format(text);
        let format = match format_name {
            Some(name) => {
                Some(Format::from_name(name).ok_or_else(|| QueryError::UnknownFormat(name.to_owned()))?)
            }
            None => None,
        };

        let list = rest.strip_prefix('@').or_else(|| rest.strip_prefix("list:"));
        let target = match list {
            Some(file) => {
                let file = file.trim();
                if file.is_empty() {
                    return Err(QueryError::MissingListFile);
                }
                QueryTarget::List(file.to_owned())
            }
            None => parse_source(rest)?,
        };

        Ok(Self {
            format,
            format_name: format_name.map(str::to_owned),
            target,
        })
    }
}

/// Split off a leading `format::`. The `::` must be the first colon.
fn split_format(text: &str) -> (Option<&str>, &str) {
    match text.find(':') {
        Some(index) if text[index..].starts_with("::") => {
            (Some(&text[..index]), &text[index + 2..])
        }
        _ => (None, text),
    }
}

fn parse_source(text: &str) -> Result<QueryTarget, QueryError> {
    let (source, selector) = match text.split_once(':') {
        Some((source, selector)) => (source.trim(), selector.trim()),
        None => (text.trim(), ""),
    };
    if source.is_empty() {
        return Err(QueryError::MissingSource);
    }
    Ok(QueryTarget::Source {
        source: source.to_owned(),
        fields: parse_selector(selector)?,
    })
}

fn parse_selector(selector: &str) -> Result<Vec<FieldQuery>, QueryError> {
    if selector.is_empty() {
        return Ok(Vec::new());
    }
    let explicit = selector
        .split_once('=')
        .filter(|(names, _)| names.chars().all(|c| c.is_ascii_alphabetic() || c == '|'));
    let Some((names, pattern)) = explicit else {
        return Ok(vec![
            FieldQuery::new(QueryField::Id, selector)?,
            FieldQuery::new(QueryField::Acc, selector)?,
        ]);
    };
    names
        .split('|')
        .map(|name| {
            let field = QueryField::from_name(name).ok_or_else(|| QueryError::UnknownField(name.to_owned()))?;
            FieldQuery::new(field, pattern)
        })
        .collect()
}
