//! Test that a single `[Term]` stanza survives load, serialize, load.

use crate::e2e_tests::helpers::{load_with, tag_shapes};
use crate::testing::term_to_obo;

const STANZA: &str = r#"[Term]
id: GO:0005636
name: obsolete nuclear part
namespace: cellular_component
def: "Any constituent part of the nucleus." [GOC:jl]
comment: This term was made obsolete because it is a grouping term.
is_a: GO:0044422 ! organelle part
relationship: part_of GO:0005634 {source="GOC:mah"} ! nucleus
xref: NIF_Subcellular:sao1499850686
is_obsolete: true
consider: GO:0005634
"#;

#[test]
fn test_round_trip_preserves_fields_and_tags() {
    let first = load_with(STANZA, "none");
    let term = first.fetch_by_id("GO:0005636").expect("term loaded");

    let serialized = term_to_obo(term);
    let second = load_with(&serialized, "none");
    let again = second.fetch_by_id("GO:0005636").expect("term reloaded");

    assert_eq!(again.id, term.id);
    assert_eq!(again.name, term.name);
    assert_eq!(again.namespace, term.namespace);
    assert_eq!(again.def, term.def);
    assert_eq!(again.comment, term.comment);
    assert_eq!(again.obsolete, term.obsolete);
    assert_eq!(tag_shapes(&again.tags), tag_shapes(&term.tags));
}

#[test]
fn test_round_trip_values() {
    let ontology = load_with(STANZA, "none");
    let term = ontology.fetch_by_id("GO:0005636").expect("term loaded");

    assert!(term.obsolete);
    assert_eq!(term.def.as_deref(), Some("Any constituent part of the nucleus."));
    assert_eq!(term.replaced.as_deref(), Some("GO:0005634"));

    let names: Vec<&str> = term.tags.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["is_a", "relationship", "xref", "is_obsolete", "consider"]
    );

    let relationship = &term.tags[1];
    assert_eq!(relationship.value, "part_of GO:0005634");
    assert_eq!(relationship.modifier.as_deref(), Some("{source=\"GOC:mah\"}"));
    assert_eq!(relationship.comment.as_deref(), Some("nucleus"));
}
