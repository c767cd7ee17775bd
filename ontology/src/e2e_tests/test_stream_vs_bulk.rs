//! Test that streaming and bulk loading see the same terms.

use crate::e2e_tests::helpers::{collect_ids, load, obo_term, stream_ids};
use crate::stream::{FileAccess, MemoryAccess, TermReader};
use crate::testing::{GO_SAMPLE, write_temp_file};
use crate::types::Term;

fn stream_all(text: &str) -> Vec<Term> {
    let access = MemoryAccess::new().with("go.obo", text);
    let mut reader = TermReader::open("go.obo", Box::new(access)).expect("open");
    let mut terms = Vec::new();
    let mut term = Term::new();
    while reader.read_next(&mut term).expect("read") {
        terms.push(term.clone());
    }
    terms
}

#[test]
fn test_stream_yields_bulk_terms_in_file_order() {
    let bulk = load(GO_SAMPLE);
    let streamed = stream_all(GO_SAMPLE);

    let bulk_ids: Vec<&str> = bulk.terms().map(|term| term.id.as_str()).collect();
    let stream_ids: Vec<&str> = streamed.iter().map(|term| term.id.as_str()).collect();
    assert_eq!(stream_ids, bulk_ids);

    for term in &streamed {
        let loaded = bulk.fetch_by_id(&term.id).expect("bulk term");
        assert_eq!(term.name, loaded.name);
        assert_eq!(term.namespace, loaded.namespace);
        assert_eq!(term.def, loaded.def);
        assert_eq!(term.obsolete, loaded.obsolete);
    }
}

#[test]
fn test_stream_keeps_synonym_and_alt_id_tags() {
    let bulk = load(GO_SAMPLE);
    let streamed = stream_all(GO_SAMPLE);

    let loaded = bulk.fetch_by_id("GO:0005634").expect("bulk nucleus");
    let nucleus = streamed
        .iter()
        .find(|term| term.id == "GO:0005634")
        .expect("streamed nucleus");

    assert_eq!(loaded.tags_named("alt_id").count(), 0);
    assert_eq!(loaded.tags_named("synonym").count(), 0);
    assert_eq!(nucleus.tags_named("alt_id").count(), 1);
    assert_eq!(nucleus.tags_named("synonym").count(), 1);
    assert_eq!(nucleus.parent_ids(), loaded.parent_ids());
}

#[test]
fn test_single_record_access() {
    let access = MemoryAccess::single_record()
        .with("entry", &obo_term("R:1", "first"))
        .with("entry", &obo_term("R:2", "second"))
        .with("entry", &obo_term("R:3", "third"));

    let ids = stream_ids("entry", access).expect("stream records");
    assert_eq!(ids, vec!["R:1", "R:2", "R:3"]);
}

#[test]
fn test_stream_from_files() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_temp_file(dir.path(), "go.obo", GO_SAMPLE);

    let access = FileAccess::with_base(dir.path());
    let mut reader = TermReader::open("go.obo:nam=nucle*", Box::new(access)).expect("open");
    let ids = collect_ids(&mut reader).expect("read");

    assert_eq!(ids, vec!["GO:0005634"]);
    assert_eq!(reader.session().records(), 5);
    assert!(reader.diagnostics().is_empty());
}
