//! Stanza types and their tag schemas.
//!
//! Each stanza type has an ordered list of tag rules. The order is the
//! canonical tag order of the OBO 1.4 flat-file format; the occurrence bounds
//! and obsolete aliases come from the same document. The schemas are only
//! used for advisory checks after a whole file has loaded.

use std::fmt;

use serde::Serialize;

/// Upper bound for tags that may repeat freely.
pub const UNBOUNDED: usize = usize::MAX;

/// The five recognised stanza types, in canonical file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StanzaType {
    Typedef,
    Term,
    Instance,
    Annotation,
    Formula,
}

impl StanzaType {
    /// All stanza types in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Typedef,
        Self::Term,
        Self::Instance,
        Self::Annotation,
        Self::Formula,
    ];

    /// Parse the text between the brackets of a stanza header.
    #[must_use]
    pub fn from_header(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Typedef => "Typedef",
            Self::Term => "Term",
            Self::Instance => "Instance",
            Self::Annotation => "Annotation",
            Self::Formula => "Formula",
        }
    }

    /// Position in the canonical stanza order.
    #[must_use]
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// The tag rules for this stanza type.
    #[must_use]
    pub const fn schema(self) -> &'static [TagRule] {
        match self {
            Self::Typedef => TYPEDEF_SCHEMA,
            Self::Term => TERM_SCHEMA,
            Self::Instance => INSTANCE_SCHEMA,
            Self::Annotation => ANNOTATION_SCHEMA,
            Self::Formula => FORMULA_SCHEMA,
        }
    }
}

impl fmt::Display for StanzaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of value a tag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A single identifier.
    Id,
    /// Free text.
    Text,
    /// A quoted string followed by a dbxref list.
    QuotedText,
    /// `true` or `false`.
    Boolean,
    /// A relationship type followed by a target id.
    Relationship,
    /// A database cross reference.
    Xref,
    /// A property, a value and an optional datatype.
    PropertyValue,
    /// A date or timestamp.
    Date,
}

/// One tag of a stanza schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRule {
    pub name: &'static str,
    pub kind: ValueKind,
    pub min: usize,
    pub max: usize,
    /// For obsolete tag names, the tag that replaces them.
    pub alias_of: Option<&'static str>,
}

const fn rule(name: &'static str, kind: ValueKind, min: usize, max: usize) -> TagRule {
    TagRule {
        name,
        kind,
        min,
        max,
        alias_of: None,
    }
}

const fn alias(name: &'static str, kind: ValueKind, of: &'static str) -> TagRule {
    TagRule {
        name,
        kind,
        min: 0,
        max: UNBOUNDED,
        alias_of: Some(of),
    }
}

/// Find a tag in a schema.
///
/// Returns the position used for ordering and counting (for aliases, the
/// position of the tag they stand for) together with the matched rule.
#[must_use]
pub fn lookup(schema: &'static [TagRule], name: &str) -> Option<(usize, &'static TagRule)> {
    let (position, found) = schema
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.name == name)?;
    match found.alias_of {
        Some(target) => schema
            .iter()
            .position(|rule| rule.name == target)
            .map(|target_position| (target_position, found)),
        None => Some((position, found)),
    }
}

use ValueKind::{Boolean, Date, Id, PropertyValue, QuotedText, Relationship, Text, Xref};

static TERM_SCHEMA: &[TagRule] = &[
    rule("id", Id, 1, 1),
    rule("is_anonymous", Boolean, 0, 1),
    rule("name", Text, 0, 1),
    rule("namespace", Text, 0, 1),
    rule("alt_id", Id, 0, UNBOUNDED),
    rule("def", QuotedText, 0, 1),
    rule("comment", Text, 0, 1),
    rule("subset", Id, 0, UNBOUNDED),
    rule("synonym", QuotedText, 0, UNBOUNDED),
    alias("exact_synonym", QuotedText, "synonym"),
    alias("narrow_synonym", QuotedText, "synonym"),
    alias("broad_synonym", QuotedText, "synonym"),
    alias("related_synonym", QuotedText, "synonym"),
    rule("xref", Xref, 0, UNBOUNDED),
    alias("xref_analog", Xref, "xref"),
    alias("xref_unk", Xref, "xref"),
    rule("builtin", Boolean, 0, 1),
    rule("property_value", PropertyValue, 0, UNBOUNDED),
    rule("is_a", Id, 0, UNBOUNDED),
    rule("intersection_of", Relationship, 0, UNBOUNDED),
    rule("union_of", Id, 0, UNBOUNDED),
    rule("equivalent_to", Id, 0, UNBOUNDED),
    rule("disjoint_from", Id, 0, UNBOUNDED),
    rule("relationship", Relationship, 0, UNBOUNDED),
    rule("created_by", Text, 0, 1),
    rule("creation_date", Date, 0, 1),
    rule("is_obsolete", Boolean, 0, 1),
    rule("replaced_by", Id, 0, UNBOUNDED),
    rule("consider", Id, 0, UNBOUNDED),
    alias("use_term", Id, "consider"),
];

static TYPEDEF_SCHEMA: &[TagRule] = &[
    rule("id", Id, 1, 1),
    rule("is_anonymous", Boolean, 0, 1),
    rule("name", Text, 0, 1),
    rule("namespace", Text, 0, 1),
    rule("alt_id", Id, 0, UNBOUNDED),
    rule("def", QuotedText, 0, 1),
    rule("comment", Text, 0, 1),
    rule("subset", Id, 0, UNBOUNDED),
    rule("synonym", QuotedText, 0, UNBOUNDED),
    alias("exact_synonym", QuotedText, "synonym"),
    alias("related_synonym", QuotedText, "synonym"),
    rule("xref", Xref, 0, UNBOUNDED),
    alias("xref_analog", Xref, "xref"),
    rule("property_value", PropertyValue, 0, UNBOUNDED),
    rule("domain", Id, 0, 1),
    rule("range", Id, 0, 1),
    rule("builtin", Boolean, 0, 1),
    rule("holds_over_chain", Relationship, 0, UNBOUNDED),
    rule("is_anti_symmetric", Boolean, 0, 1),
    rule("is_cyclic", Boolean, 0, 1),
    rule("is_reflexive", Boolean, 0, 1),
    rule("is_symmetric", Boolean, 0, 1),
    rule("is_transitive", Boolean, 0, 1),
    rule("is_functional", Boolean, 0, 1),
    rule("is_inverse_functional", Boolean, 0, 1),
    rule("is_a", Id, 0, UNBOUNDED),
    rule("intersection_of", Relationship, 0, UNBOUNDED),
    rule("union_of", Id, 0, UNBOUNDED),
    rule("equivalent_to", Id, 0, UNBOUNDED),
    rule("disjoint_from", Id, 0, UNBOUNDED),
    rule("inverse_of", Id, 0, 1),
    rule("transitive_over", Id, 0, UNBOUNDED),
    rule("equivalent_to_chain", Relationship, 0, UNBOUNDED),
    rule("disjoint_over", Id, 0, UNBOUNDED),
    rule("relationship", Relationship, 0, UNBOUNDED),
    rule("is_obsolete", Boolean, 0, 1),
    rule("created_by", Text, 0, 1),
    rule("creation_date", Date, 0, 1),
    rule("replaced_by", Id, 0, UNBOUNDED),
    rule("consider", Id, 0, UNBOUNDED),
    rule("expand_assertion_to", QuotedText, 0, UNBOUNDED),
    rule("expand_expression_to", QuotedText, 0, UNBOUNDED),
    rule("is_metadata_tag", Boolean, 0, 1),
    rule("is_class_level", Boolean, 0, 1),
];

static INSTANCE_SCHEMA: &[TagRule] = &[
    rule("id", Id, 1, 1),
    rule("is_anonymous", Boolean, 0, 1),
    rule("name", Text, 0, 1),
    rule("namespace", Text, 0, 1),
    rule("alt_id", Id, 0, UNBOUNDED),
    rule("comment", Text, 0, 1),
    rule("xref", Xref, 0, UNBOUNDED),
    rule("synonym", QuotedText, 0, UNBOUNDED),
    rule("instance_of", Id, 0, 1),
    rule("property_value", PropertyValue, 0, UNBOUNDED),
    rule("relationship", Relationship, 0, UNBOUNDED),
    rule("created_by", Text, 0, 1),
    rule("creation_date", Date, 0, 1),
    rule("is_obsolete", Boolean, 0, 1),
    rule("replaced_by", Id, 0, UNBOUNDED),
    rule("consider", Id, 0, UNBOUNDED),
];

static ANNOTATION_SCHEMA: &[TagRule] = &[
    rule("id", Id, 1, 1),
    rule("is_anonymous", Boolean, 0, 1),
    rule("name", Text, 0, 1),
    rule("subject", Id, 0, 1),
    rule("relation", Id, 0, 1),
    rule("object", Id, 0, 1),
    rule("source", Id, 0, UNBOUNDED),
    rule("assigned_by", Text, 0, 1),
    rule("is_negated", Boolean, 0, 1),
    rule("comment", Text, 0, 1),
];

static FORMULA_SCHEMA: &[TagRule] = &[
    rule("id", Id, 1, 1),
    rule("is_anonymous", Boolean, 0, 1),
    rule("name", Text, 0, 1),
    rule("formula", QuotedText, 0, 1),
    rule("comment", Text, 0, 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_is_case_sensitive() {
        assert_eq!(StanzaType::from_header("Term"), Some(StanzaType::Term));
        assert_eq!(StanzaType::from_header("Typedef"), Some(StanzaType::Typedef));
        assert_eq!(StanzaType::from_header("term"), None);
        assert_eq!(StanzaType::from_header("Relation"), None);
    }

    #[test]
    fn test_rank_follows_canonical_order() {
        assert!(StanzaType::Typedef.rank() < StanzaType::Term.rank());
        assert!(StanzaType::Term.rank() < StanzaType::Instance.rank());
        assert!(StanzaType::Annotation.rank() < StanzaType::Formula.rank());
    }

    #[test]
    fn test_lookup_resolves_aliases_to_target_position() {
        let schema = StanzaType::Term.schema();
        let (synonym_position, _) = lookup(schema, "synonym").expect("synonym rule");
        let (alias_position, rule) = lookup(schema, "exact_synonym").expect("alias rule");
        assert_eq!(alias_position, synonym_position);
        assert_eq!(rule.alias_of, Some("synonym"));
        assert!(lookup(schema, "not_a_tag").is_none());
    }

    #[test]
    fn test_every_schema_starts_with_required_id() {
        for kind in StanzaType::ALL {
            let first = kind.schema()[0];
            assert_eq!(first.name, "id");
            assert_eq!((first.min, first.max), (1, 1));
        }
    }
}
