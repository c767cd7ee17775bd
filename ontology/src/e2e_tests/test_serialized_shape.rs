//! Test the JSON shape handed to external formatters.

use crate::diagnostics::DiagnosticKind;
use crate::e2e_tests::helpers::load;
use crate::testing::GO_SAMPLE;

#[test]
fn test_term_json_shape() {
    let ontology = load(GO_SAMPLE);
    let term = ontology.fetch_by_id("GO:0043231").expect("term");

    let json = serde_json::to_value(term).expect("serialize term");
    assert_eq!(json["id"], "GO:0043231");
    assert_eq!(json["db"], "GO");
    assert_eq!(json["local_id"], "0043231");
    assert_eq!(json["namespace"], "cellular_component");
    assert_eq!(json["obsolete"], false);
    assert!(json["true_id"].is_null());

    let tag = &json["tags"][0];
    assert_eq!(tag["name"], "relationship");
    assert_eq!(tag["value"], "part_of GO:0005634");
    assert_eq!(tag["comment"], "nucleus");
    assert!(tag["modifier"].is_null());
    assert_eq!(tag["line_number"], 39);
}

#[test]
fn test_diagnostic_json_shape() {
    let ontology = load("[Term]\nid: X:1\nid: X:2\n");
    let diagnostic = ontology
        .diagnostics()
        .iter()
        .find(|d| d.kind == DiagnosticKind::RepeatedTag)
        .expect("repeated id");

    let json = serde_json::to_value(diagnostic).expect("serialize diagnostic");
    assert_eq!(json["kind"], "RepeatedTag");
    assert_eq!(json["source"], "test.obo");
    assert_eq!(json["line"], 3);
    assert_eq!(json["term_id"], "X:1");
}
