//! Test whole-file reference checks after loading.

use crate::diagnostics::DiagnosticKind;
use crate::e2e_tests::helpers::{load, load_with};
use crate::testing::GO_SAMPLE;

const BROKEN: &str = "\
[Typedef]
id: part_of
name: part of

[Term]
id: X:1
name: root

[Term]
id: X:2
name: leaf
is_a: X:1 ! trunk
is_a: X:9 ! missing
relationship: regulates X:1 ! root
";

#[test]
fn test_sample_is_clean() {
    let ontology = load(GO_SAMPLE);
    assert!(
        ontology.diagnostics().is_empty(),
        "unexpected: {:?}",
        ontology.diagnostics().entries()
    );

    let nucleus = ontology.fetch_by_id("GO:0005634").expect("nucleus");
    let parents: Vec<&str> = ontology
        .parents(nucleus)
        .into_iter()
        .map(|term| term.id.as_str())
        .collect();
    assert_eq!(parents, vec!["GO:0043231"]);
    assert_eq!(ontology.header_value("ontology"), Some("go"));
    assert_eq!(ontology.id_prefixes().get("GO"), Some(&6));
}

#[test]
fn test_broken_references_are_reported() {
    let ontology = load(BROKEN);
    let diagnostics = ontology.diagnostics();

    assert_eq!(diagnostics.count(DiagnosticKind::NameMismatch), 1);
    assert_eq!(diagnostics.count(DiagnosticKind::UnknownId), 1);
    assert_eq!(diagnostics.count(DiagnosticKind::UnknownRelationship), 1);

    let unknown = diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::UnknownId)
        .expect("unknown id diagnostic");
    assert_eq!(unknown.term_id.as_deref(), Some("X:2"));
    assert_eq!(unknown.line, 13);
}

#[test]
fn test_unknown_id_checks_can_be_disabled() {
    let ontology = load_with(BROKEN, "nounkid");
    let diagnostics = ontology.diagnostics();

    assert!(!diagnostics.has(DiagnosticKind::UnknownId));
    assert!(!diagnostics.has(DiagnosticKind::UnknownRelationship));
    assert_eq!(diagnostics.count(DiagnosticKind::NameMismatch), 1);
}

#[test]
fn test_none_skips_cross_references() {
    let ontology = load_with(BROKEN, "none");
    assert!(ontology.diagnostics().is_empty());
    assert_eq!(ontology.term_count(), 2);
}
