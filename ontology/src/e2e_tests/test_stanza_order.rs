//! Test that out-of-order stanzas warn but are still indexed.

use crate::diagnostics::DiagnosticKind;
use crate::e2e_tests::helpers::load;
use crate::types::StanzaType;

const TEXT: &str = "\
[Typedef]
id: part_of
name: part of

[Term]
id: X:1
name: cell

[Typedef]
id: has_part
name: has part
";

#[test]
fn test_typedef_after_term_warns_once() {
    let ontology = load(TEXT);

    let order: Vec<_> = ontology
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::StanzaOrder)
        .collect();
    assert_eq!(order.len(), 1);
    assert_eq!(order[0].line, 9);
    assert_eq!(ontology.diagnostics().len(), 1);
}

#[test]
fn test_every_stanza_is_indexed() {
    let ontology = load(TEXT);

    assert!(ontology.is_typedef("part_of"));
    assert!(ontology.is_typedef("has_part"));
    assert_eq!(ontology.stanzas(StanzaType::Typedef).map(|t| t.len()), Some(2));
    assert_eq!(
        ontology.fetch_by_id("X:1").and_then(|t| t.name.as_deref()),
        Some("cell")
    );
}

#[test]
fn test_canonical_order_is_silent() {
    let text = "[Typedef]\nid: part_of\n\n[Term]\nid: X:1\n\n[Instance]\nid: i1\ninstance_of: X:1\n";
    let ontology = load(text);
    assert!(!ontology.diagnostics().has(DiagnosticKind::StanzaOrder));
    assert_eq!(ontology.stanzas(StanzaType::Instance).map(|t| t.len()), Some(1));
}
