//! Test alt-id stubs and their resolution.

use crate::diagnostics::DiagnosticKind;
use crate::e2e_tests::helpers::load;
use crate::testing::GO_SAMPLE;

#[test]
fn test_alt_id_stub_points_at_owner() {
    let ontology = load(GO_SAMPLE);

    for key in ontology.term_keys() {
        let entry = ontology.entry(key).expect("keyed entry");
        if let Some(true_id) = entry.true_id.as_deref() {
            let owner = ontology.entry(true_id).expect("stub owner");
            assert!(!owner.is_stub());
            assert_eq!(ontology.fetch_by_id(key), Some(owner));
        }
    }

    let stub = ontology.entry("GO:0005635").expect("stub entry");
    assert!(stub.is_stub());
    assert_eq!(stub.true_id.as_deref(), Some("GO:0005634"));
    assert!(stub.name.is_none());
}

#[test]
fn test_alt_id_resolves_to_same_term() {
    let ontology = load(GO_SAMPLE);

    let by_alt = ontology.fetch_by_id("GO:0005635").expect("alt id resolves");
    let by_id = ontology.fetch_by_id("GO:0005634").expect("primary id");
    assert_eq!(by_alt, by_id);
    assert_eq!(ontology.resolve_alt_id("GO:0005635"), Some("GO:0005634"));
    assert_eq!(ontology.resolve_alt_id("GO:0005634"), None);
}

#[test]
fn test_stubs_are_not_terms() {
    let ontology = load(GO_SAMPLE);

    assert_eq!(ontology.term_count(), 5);
    assert!(ontology.terms().all(|term| !term.is_stub()));
    assert!(ontology.term_keys().any(|key| key == "GO:0005635"));
}

#[test]
fn test_alt_id_taken_by_a_term() {
    let text = "[Term]\nid: X:1\nname: one\nalt_id: X:2\n\n[Term]\nid: X:2\nname: two\n";
    let ontology = load(text);

    assert!(ontology.diagnostics().has(DiagnosticKind::DuplicateId));
    assert_eq!(ontology.resolve_alt_id("X:2"), Some("X:1"));
}
