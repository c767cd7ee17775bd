//! Common helpers for end-to-end tests.

use crate::store::{Ontology, ValidationToggles};
use crate::stream::{MemoryAccess, StreamError, TermReader};
use crate::types::{Tag, Term};

/// Load a document with every check enabled.
#[must_use]
pub fn load(text: &str) -> Ontology {
    Ontology::parse_str("test.obo", text, ValidationToggles::default())
}

/// Load a document with a toggle string such as `noidorder`.
#[must_use]
pub fn load_with(text: &str, toggles: &str) -> Ontology {
    let (toggles, unknown) = ValidationToggles::parse(toggles);
    assert!(unknown.is_empty(), "unknown toggles: {unknown:?}");
    Ontology::parse_str("test.obo", text, toggles)
}

/// A minimal `[Term]` stanza.
#[must_use]
pub fn obo_term(id: &str, name: &str) -> String {
    format!("[Term]\nid: {id}\nname: {name}\n\n")
}

/// Open a stream over in-memory sources and collect every matching id.
pub fn stream_ids(query: &str, access: MemoryAccess) -> Result<Vec<String>, StreamError> {
    let mut reader = TermReader::open(query, Box::new(access))?;
    collect_ids(&mut reader)
}

/// Drain a reader, collecting the ids it yields.
pub fn collect_ids(reader: &mut TermReader) -> Result<Vec<String>, StreamError> {
    let mut term = Term::new();
    let mut ids = Vec::new();
    while reader.read_next(&mut term)? {
        ids.push(term.id.clone());
    }
    Ok(ids)
}

/// A chain of `levels` list files, `list1` through `list<levels>`.
///
/// Each list names the next one; the last names `data.obo`, which holds a
/// single term `LEAF:1`. Query it as `@list1`.
#[must_use]
pub fn list_chain(levels: usize) -> MemoryAccess {
    let mut access = MemoryAccess::new().with("data.obo", &obo_term("LEAF:1", "leaf"));
    for level in 1..=levels {
        let entry = if level == levels {
            "data.obo".to_owned()
        } else {
            format!("@list{}", level + 1)
        };
        access.insert(&format!("list{level}"), &format!("{entry}\n"));
    }
    access
}

/// The parts of a tag that survive serialization; line numbers do not.
pub type TagShape = (String, String, Option<String>, Option<String>);

#[must_use]
pub fn tag_shapes(tags: &[Tag]) -> Vec<TagShape> {
    tags.iter()
        .map(|tag| {
            (
                tag.name.clone(),
                tag.value.clone(),
                tag.modifier.clone(),
                tag.comment.clone(),
            )
        })
        .collect()
}
