//! Whole-file ontology loading and lookup.
//!
//! An [`Ontology`] is built once by [`Ontology::load`] (or one of the other
//! constructors) and is read-only afterwards. Terms live in an arena owned by
//! the ontology; every other structure refers to them by id through the term
//! and name tables.
//!
//! # Example
//!
//! ```ignore
//! use ontology::store::Ontology;
//!
//! let go = Ontology::load(path, "noidorder")?;
//! let nucleus = go.fetch_by_id("GO:0005634").expect("known term");
//! let same = go.fetch_by_name("cellular_component:nucleus");
//! for parent in go.parents(nucleus) {
//!     println!("{} {}", parent.id, parent.name.as_deref().unwrap_or(""));
//! }
//! ```

mod loader;
pub mod sort;
pub mod toggles;
mod validate;

use std::collections::{BTreeMap, HashMap};

pub use loader::LoadError;
pub use toggles::ValidationToggles;

use crate::constants::{MAX_ALT_ID_HOPS, OBSOLETE_SUFFIX};
use crate::diagnostics::Diagnostics;
use crate::parse::StanzaKind;
use crate::types::{StanzaType, Tag, Term};

/// Build a name-table key.
///
/// `namespace:text`, or bare `text` without a namespace, with
/// `" (obsolete)"` appended for obsolete terms.
#[must_use]
pub fn name_key(namespace: Option<&str>, text: &str, obsolete: bool) -> String {
    let mut key = match namespace {
        Some(namespace) => format!("{namespace}:{text}"),
        None => text.to_owned(),
    };
    if obsolete {
        key.push_str(OBSOLETE_SUFFIX);
    }
    key
}

/// One non-Term stanza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StanzaEntry {
    pub id: String,
    /// Every tag of the stanza, `id` included.
    pub tags: Vec<Tag>,
    /// The line of the stanza header.
    pub line: usize,
}

/// Id-keyed stanzas of one type, in file order.
#[derive(Debug, Default)]
pub struct StanzaTable {
    entries: Vec<StanzaEntry>,
    index: HashMap<String, usize>,
}

impl StanzaTable {
    /// Insert an entry. A duplicate id is rejected and handed back.
    pub(crate) fn insert(&mut self, entry: StanzaEntry) -> Result<(), StanzaEntry> {
        if self.index.contains_key(&entry.id) {
            return Err(entry);
        }
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StanzaEntry> {
        self.index.get(id).and_then(|&index| self.entries.get(index))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StanzaEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A loaded ontology.
///
/// # Invariants
///
/// - Every value of `term_table` and `name_table` indexes into `terms`.
/// - Every alt-id stub in `terms` has `true_id` set.
/// - The tables never change after loading completes.
#[derive(Debug, Default)]
pub struct Ontology {
    source: String,
    header: Vec<Tag>,
    terms: Vec<Term>,
    term_table: HashMap<String, usize>,
    name_table: HashMap<String, usize>,
    stanza_tables: HashMap<StanzaType, StanzaTable>,
    other_tables: BTreeMap<String, StanzaTable>,
    id_prefixes: BTreeMap<String, usize>,
    diagnostics: Diagnostics,
}

impl Ontology {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            ..Self::default()
        }
    }

    /// The file or stream name the ontology was loaded from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tags of the header block, in file order.
    #[must_use]
    pub fn header(&self) -> &[Tag] {
        &self.header
    }

    /// First header tag with the given name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.header
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }

    /// Advisory diagnostics raised while loading.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Id prefixes seen on stanza ids, with how often each occurred.
    #[must_use]
    pub const fn id_prefixes(&self) -> &BTreeMap<String, usize> {
        &self.id_prefixes
    }

    /// Whether an id prefix was seen on any stanza id.
    #[must_use]
    pub fn is_tracked_prefix(&self, prefix: &str) -> bool {
        self.id_prefixes.contains_key(prefix)
    }

    /// Terms in file order, alt-id stubs excluded.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter().filter(|term| !term.is_stub())
    }

    /// Number of terms, alt-id stubs excluded.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.terms().count()
    }

    /// Every key of the term table, alt ids included.
    pub fn term_keys(&self) -> impl Iterator<Item = &str> {
        self.term_table.keys().map(String::as_str)
    }

    /// Every key of the name table.
    pub fn name_keys(&self) -> impl Iterator<Item = &str> {
        self.name_table.keys().map(String::as_str)
    }

    /// The raw term-table entry for an id, without following alt ids.
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&Term> {
        self.term_table
            .get(id)
            .and_then(|&index| self.terms.get(index))
    }

    /// Fetch a term by id, following alt-id stubs to the term that owns them.
    ///
    /// Gives up after 256 redirects.
    #[must_use]
    pub fn fetch_by_id(&self, id: &str) -> Option<&Term> {
        let mut term = self.entry(id)?;
        for _ in 0..MAX_ALT_ID_HOPS {
            match term.true_id.as_deref() {
                None => return Some(term),
                Some(next) => term = self.entry(next)?,
            }
        }
        tracing::warn!(id, "alt_id chain exceeds {MAX_ALT_ID_HOPS} redirects");
        None
    }

    /// The primary id an alt id redirects to.
    #[must_use]
    pub fn resolve_alt_id(&self, id: &str) -> Option<&str> {
        let entry = self.entry(id)?;
        if !entry.is_stub() {
            return None;
        }
        self.fetch_by_id(id).map(|term| term.id.as_str())
    }

    /// Fetch a term by name-table key, e.g. `cellular_component:nucleus`.
    #[must_use]
    pub fn fetch_by_name(&self, key: &str) -> Option<&Term> {
        self.name_table
            .get(key)
            .and_then(|&index| self.terms.get(index))
    }

    /// Fetch a term by namespace and name or synonym.
    #[must_use]
    pub fn fetch_by_name_in(&self, namespace: Option<&str>, name: &str, obsolete: bool) -> Option<&Term> {
        self.fetch_by_name(&name_key(namespace, name, obsolete))
    }

    /// The direct `is_a` parents of a term. Unresolvable parents are skipped.
    #[must_use]
    pub fn parents(&self, term: &Term) -> Vec<&Term> {
        term.parent_ids()
            .into_iter()
            .filter_map(|id| self.fetch_by_id(id))
            .collect()
    }

    /// The `[Typedef]` table.
    #[must_use]
    pub fn typedefs(&self) -> Option<&StanzaTable> {
        self.stanzas(StanzaType::Typedef)
    }

    /// The table for a non-Term stanza type.
    #[must_use]
    pub fn stanzas(&self, kind: StanzaType) -> Option<&StanzaTable> {
        self.stanza_tables.get(&kind)
    }

    /// The table for an unrecognised stanza type name.
    #[must_use]
    pub fn other_stanzas(&self, name: &str) -> Option<&StanzaTable> {
        self.other_tables.get(name)
    }

    /// Whether `id` names a known `[Typedef]`.
    #[must_use]
    pub fn is_typedef(&self, id: &str) -> bool {
        self.typedefs().is_some_and(|table| table.contains(id))
    }

    /// Insert a term. A duplicate id is rejected and handed back.
    fn insert_term(&mut self, term: Term) -> Result<usize, Term> {
        if self.term_table.contains_key(&term.id) {
            return Err(term);
        }
        let index = self.terms.len();
        self.term_table.insert(term.id.clone(), index);
        self.terms.push(term);
        Ok(index)
    }

    /// Register a name-table key. A taken key is rejected with its owner.
    fn insert_name(&mut self, key: String, index: usize) -> Result<(), usize> {
        if let Some(&owner) = self.name_table.get(&key) {
            return Err(owner);
        }
        self.name_table.insert(key, index);
        Ok(())
    }

    fn table_mut(&mut self, kind: &StanzaKind) -> &mut StanzaTable {
        match kind {
            StanzaKind::Known(kind) => self.stanza_tables.entry(*kind).or_default(),
            StanzaKind::Other(name) => self.other_tables.entry(name.clone()).or_default(),
        }
    }
}
