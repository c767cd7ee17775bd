//! Test query lists: expansion order, inherited formats and the depth guard.

use crate::constants::MAX_LIST_DEPTH;
use crate::diagnostics::DiagnosticKind;
use crate::e2e_tests::helpers::{collect_ids, list_chain, obo_term, stream_ids};
use crate::stream::{Format, MemoryAccess, StreamError, TermReader};
use crate::types::Term;

fn abc_access() -> MemoryAccess {
    MemoryAccess::new()
        .with("a.obo", &obo_term("A:1", "a"))
        .with("b.obo", &obo_term("B:1", "b"))
        .with("c.obo", &obo_term("C:1", "c"))
        .with("main.txt", "# sources\na.obo\n\n@sub.txt\n")
        .with("sub.txt", "b.obo\nc.obo\n")
}

#[test]
fn test_nested_list_expands_in_order() {
    let ids = stream_ids("@main.txt", abc_access()).expect("stream list");
    assert_eq!(ids, vec!["A:1", "B:1", "C:1"]);

    let ids = stream_ids("list:main.txt", abc_access()).expect("stream list");
    assert_eq!(ids, vec!["A:1", "B:1", "C:1"]);
}

#[test]
fn test_list_entries_carry_their_own_selectors() {
    let access = abc_access()
        .with("both.obo", &format!("{}{}", obo_term("D:1", "dog"), obo_term("D:2", "cat")))
        .with("picky.txt", "both.obo:nam=cat\na.obo\n");

    let ids = stream_ids("@picky.txt", access).expect("stream list");
    assert_eq!(ids, vec!["D:2", "A:1"]);
}

#[test]
fn test_list_entries_inherit_format() {
    let mut reader = TermReader::open("obo::@main.txt", Box::new(abc_access())).expect("open");
    assert_eq!(reader.format(), Some(Format::Obo));
    assert_eq!(reader.format_name(), Some("obo"));

    let mut term = Term::new();
    assert!(reader.read_next(&mut term).expect("read"));
    assert_eq!(term.id, "A:1");
    assert_eq!(reader.source_name(), Some("a.obo"));
    assert_eq!(reader.pending(), 1);
}

#[test]
fn test_depth_guard() {
    let ids = stream_ids("@list1", list_chain(MAX_LIST_DEPTH)).expect("16 levels");
    assert_eq!(ids, vec!["LEAF:1"]);

    let err = stream_ids("@list1", list_chain(MAX_LIST_DEPTH + 1)).expect_err("17 levels");
    match err {
        StreamError::ListTooDeep { depth, .. } => assert_eq!(depth, MAX_LIST_DEPTH + 1),
        other => panic!("expected ListTooDeep, got {other}"),
    }
}

#[test]
fn test_failed_entries_are_skipped() {
    let access = abc_access()
        .with("junk.txt", "hello\nworld\n")
        .with("noterms.obo", "format-version: 1.2\n")
        .with("nameless.obo", "[Term]\nname: no id\n")
        .with(
            "entries.txt",
            "missing.obo\njunk.txt\nnoterms.obo\na.obo:bogus=1\n@nowhere.txt\na.obo\n",
        );

    let mut reader = TermReader::open("@entries.txt", Box::new(access.clone())).expect("open");
    assert_eq!(collect_ids(&mut reader).expect("read"), vec!["A:1"]);
    assert_eq!(reader.diagnostics().count(DiagnosticKind::SkippedEntry), 5);

    for list in ["missing.obo\na.obo\n", "junk.txt\na.obo\n", "a.obo:bogus=1\na.obo\n"] {
        let ids = stream_ids("@l.txt", access.clone().with("l.txt", list)).expect("stream list");
        assert_eq!(ids, vec!["A:1"], "list {list:?}");
    }

    let ids = stream_ids("@l.txt", access.with("l.txt", "nameless.obo\nb.obo\n")).expect("stream list");
    assert_eq!(ids, vec!["B:1"]);
}

#[test]
fn test_depth_overflow_inside_a_list_is_still_fatal() {
    let access = list_chain(MAX_LIST_DEPTH + 1).with("top.txt", "a.obo\n@list1\n");
    let err = stream_ids("@top.txt", access).expect_err("too deep");
    assert!(matches!(err, StreamError::ListTooDeep { .. }));
}

#[test]
fn test_missing_list_file_is_fatal() {
    let err = stream_ids("@nowhere.txt", abc_access()).expect_err("missing list");
    assert!(matches!(err, StreamError::Open { .. }));
}
