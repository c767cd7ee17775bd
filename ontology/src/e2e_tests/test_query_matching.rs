//! Test field queries against terms, directly and through a stream.

use crate::e2e_tests::helpers::{collect_ids, obo_term, stream_ids};
use crate::stream::{FieldQuery, MemoryAccess, Query, QueryField, TermReader};
use crate::testing::GO_SAMPLE;
use crate::types::Term;

fn foo_bar() -> Term {
    let mut term = Term::new();
    term.set_id("GO:0001", "GO:0001");
    term.name = Some("foo bar".to_owned());
    term
}

fn query(field: QueryField, pattern: &str, case_sensitive_id: bool) -> Query {
    let mut query = Query::new(vec![FieldQuery::new(field, pattern).expect("valid pattern")]);
    query.case_sensitive_id = case_sensitive_id;
    query
}

#[test]
fn test_name_and_id_fields() {
    let term = foo_bar();

    assert!(query(QueryField::Nam, "foo*", true).matches(&term));
    assert!(query(QueryField::Id, "GO:0001", true).matches(&term));
    assert!(!query(QueryField::Id, "go:0001", true).matches(&term));
    assert!(query(QueryField::Id, "go:0001", false).matches(&term));
    assert!(query(QueryField::Acc, "go:0001", true).matches(&term));
    assert!(!query(QueryField::Nam, "bar*", true).matches(&term));
}

#[test]
fn test_description_words() {
    let mut term = foo_bar();
    assert!(!query(QueryField::Des, "*", false).matches(&term));

    term.def = Some("The distribution of mitochondria".to_owned());
    assert!(query(QueryField::Des, "mito*", false).matches(&term));
    assert!(!query(QueryField::Des, "nucle*", false).matches(&term));
}

#[test]
fn test_description_words_followed_by_punctuation() {
    let mut term = foo_bar();
    term.def = Some("The nucleus, a membrane-bounded organelle.".to_owned());
    assert!(query(QueryField::Des, "nucleus", false).matches(&term));
    assert!(query(QueryField::Des, "ORGANELLE", false).matches(&term));
    assert!(query(QueryField::Des, "membrane-bounded", false).matches(&term));
    assert!(!query(QueryField::Des, "membrane", false).matches(&term));

    let access = MemoryAccess::new().with("go.obo", GO_SAMPLE);
    let ids = stream_ids("go.obo:des=replicated", access.clone()).expect("read");
    assert_eq!(ids, vec!["GO:0005634"]);
    let ids = stream_ids("go.obo:des=meiosis", access).expect("read");
    assert_eq!(ids, vec!["GO:0000001"]);
}

#[test]
fn test_case_sensitive_id_through_stream() {
    let access = MemoryAccess::new().with(
        "go.obo",
        &format!("{}{}", obo_term("GO:0001", "foo bar"), obo_term("GO:0002", "baz")),
    );

    let mut reader = TermReader::open("go.obo:id=go:0001", Box::new(access.clone())).expect("open");
    reader.set_case_sensitive_id(true);
    assert!(collect_ids(&mut reader).expect("read").is_empty());
    assert_eq!(reader.session().records(), 2);

    let ids = stream_ids("go.obo:id=go:0001", access.clone()).expect("read");
    assert_eq!(ids, vec!["GO:0001"]);

    let ids = stream_ids("go.obo:nam=foo*", access.clone()).expect("read");
    assert_eq!(ids, vec!["GO:0001"]);

    let ids = stream_ids("go.obo:nam|id=ba*", access).expect("read");
    assert_eq!(ids, vec!["GO:0002"]);
}
