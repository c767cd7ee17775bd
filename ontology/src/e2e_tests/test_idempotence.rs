//! Test that loading the same bytes twice gives the same tables.

use std::collections::BTreeSet;

use crate::store::{Ontology, ValidationToggles};
use crate::testing::{GO_SAMPLE, write_temp_file};

fn keys<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    keys.map(str::to_owned).collect()
}

#[test]
fn test_loading_twice_is_identical() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_temp_file(dir.path(), "go.obo", GO_SAMPLE);

    let first = Ontology::load(&path, "").expect("first load");
    let second = Ontology::load(&path, "").expect("second load");

    assert_eq!(keys(first.term_keys()), keys(second.term_keys()));
    assert_eq!(keys(first.name_keys()), keys(second.name_keys()));

    let first_terms: Vec<_> = first.terms().collect();
    let second_terms: Vec<_> = second.terms().collect();
    assert_eq!(first_terms, second_terms);

    for key in first.term_keys() {
        assert_eq!(first.entry(key), second.entry(key), "entry {key}");
    }
    assert_eq!(first.header(), second.header());
    assert_eq!(first.id_prefixes(), second.id_prefixes());
}

#[test]
fn test_file_and_memory_loads_agree() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_temp_file(dir.path(), "go.obo", GO_SAMPLE);

    let from_file = Ontology::load_with(&path, ValidationToggles::default()).expect("load");
    let from_text = Ontology::parse_str("go.obo", GO_SAMPLE, ValidationToggles::default());

    assert_eq!(keys(from_file.term_keys()), keys(from_text.term_keys()));
    assert_eq!(keys(from_file.name_keys()), keys(from_text.name_keys()));
    assert_eq!(
        from_file.terms().collect::<Vec<_>>(),
        from_text.terms().collect::<Vec<_>>()
    );
}
