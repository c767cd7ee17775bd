/// Maximum nesting of list files inside list files.
pub const MAX_LIST_DEPTH: usize = 16;

/// Maximum number of alt-id redirects followed when resolving an id.
pub const MAX_ALT_ID_HOPS: usize = 256;

/// Suffix added to name-table keys of obsolete terms.
pub const OBSOLETE_SUFFIX: &str = " (obsolete)";

/// Tags allowed in the header block, before the first stanza.
pub const HEADER_TAGS: &[&str] = &[
    "format-version",
    "data-version",
    "version",
    "date",
    "saved-by",
    "auto-generated-by",
    "subsetdef",
    "import",
    "synonymtypedef",
    "idspace",
    "default-relationship-id-prefix",
    "id-mapping",
    "remark",
    "ontology",
    "owl-axioms",
    "default-namespace",
    "namespace-id-rule",
    "property_value",
    "next_id",
    "treat-xrefs-as-equivalent",
    "treat-xrefs-as-genus-differentia",
    "treat-xrefs-as-relationship",
    "treat-xrefs-as-is_a",
    "treat-xrefs-as-reverse-genus-differentia",
    "relax-unique-identifier-assumption-for-namespace",
    "relax-unique-label-assumption-for-namespace",
];
