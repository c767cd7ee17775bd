//! Test that backslash continuations join physical lines transparently.

use crate::e2e_tests::helpers::{load_with, stream_ids};
use crate::stream::MemoryAccess;

const JOINED: &str = "[Term]\nid: FOO:BAR\nname: foo bar\n";
const SPLIT: &str = "[Term]\nid: FOO\\\n:BAR\nname: foo bar\n";

#[test]
fn test_split_id_loads_like_joined_id() {
    let joined = load_with(JOINED, "none");
    let split = load_with(SPLIT, "none");

    let joined_term = joined.fetch_by_id("FOO:BAR").expect("joined id");
    let split_term = split.fetch_by_id("FOO:BAR").expect("split id");
    assert_eq!(split_term, joined_term);
    assert_eq!(split_term.db.as_deref(), Some("FOO"));
    assert_eq!(split_term.local_id, "BAR");
    assert!(split.fetch_by_id("FOO").is_none());
}

#[test]
fn test_split_id_streams_like_joined_id() {
    let access = MemoryAccess::new()
        .with("joined.obo", JOINED)
        .with("split.obo", SPLIT);

    let joined = stream_ids("joined.obo", access.clone()).expect("stream joined");
    let split = stream_ids("split.obo", access).expect("stream split");
    assert_eq!(joined, vec!["FOO:BAR"]);
    assert_eq!(split, joined);
}

#[test]
fn test_continuation_across_several_lines() {
    let text = "[Term]\nid: X:1\nname: a\\\n very\\\n long name\n";
    let ontology = load_with(text, "none");
    let term = ontology.fetch_by_id("X:1").expect("term");
    assert_eq!(term.name.as_deref(), Some("a very long name"));
}
