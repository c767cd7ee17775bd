//! Test the name table: namespace-qualified names and synonyms.

use crate::diagnostics::DiagnosticKind;
use crate::e2e_tests::helpers::{load, load_with};
use crate::store::name_key;
use crate::testing::GO_SAMPLE;

#[test]
fn test_every_namespaced_term_is_keyed_by_name() {
    let ontology = load(GO_SAMPLE);
    assert!(!ontology.diagnostics().has(DiagnosticKind::DuplicateName));

    for term in ontology.terms() {
        let (Some(namespace), Some(name)) = (term.namespace.as_deref(), term.name.as_deref()) else {
            continue;
        };
        let key = name_key(Some(namespace), name, term.obsolete);
        let found = ontology.fetch_by_name(&key).expect("name key registered");
        assert_eq!(found.id, term.id, "key {key}");
    }
}

#[test]
fn test_obsolete_suffix_and_synonyms() {
    let ontology = load(GO_SAMPLE);

    let obsolete = ontology
        .fetch_by_name("cellular_component:obsolete nuclear part (obsolete)")
        .expect("obsolete key");
    assert_eq!(obsolete.id, "GO:0005636");
    assert!(
        ontology
            .fetch_by_name("cellular_component:obsolete nuclear part")
            .is_none()
    );

    let synonym = ontology
        .fetch_by_name_in(Some("cellular_component"), "cell nucleus", false)
        .expect("synonym key");
    assert_eq!(synonym.id, "GO:0005634");
}

#[test]
fn test_name_collision_keeps_first_owner() {
    let text = "[Term]\nid: X:1\nname: shared\nnamespace: ns\n\n\
                [Term]\nid: X:2\nname: shared\nnamespace: ns\n";
    let ontology = load(text);

    assert_eq!(ontology.diagnostics().count(DiagnosticKind::DuplicateName), 1);
    assert_eq!(ontology.fetch_by_name("ns:shared").map(|t| t.id.as_str()), Some("X:1"));
    assert!(ontology.fetch_by_id("X:2").is_some());
}

#[test]
fn test_synonym_collision_follows_toggle() {
    let text = "[Term]\nid: X:1\nname: alpha\nnamespace: ns\n\n\
                [Term]\nid: X:2\nname: beta\nnamespace: ns\nsynonym: \"alpha\" EXACT []\n";

    let strict = load(text);
    assert_eq!(strict.diagnostics().count(DiagnosticKind::DuplicateName), 1);

    let lenient = load_with(text, "nomultisynonym");
    assert!(!lenient.diagnostics().has(DiagnosticKind::DuplicateName));
    assert_eq!(lenient.fetch_by_name("ns:alpha").map(|t| t.id.as_str()), Some("X:1"));
}
