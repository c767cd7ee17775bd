//! Shared test fixtures.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::types::Term;

/// A small, warning-free Gene Ontology extract.
pub const GO_SAMPLE: &str = r#"format-version: 1.2
data-version: releases/2024-01-01
default-namespace: gene_ontology
ontology: go

[Typedef]
id: part_of
name: part of
is_transitive: true

[Term]
id: GO:0000001
name: mitochondrion inheritance
namespace: biological_process
def: "The distribution of mitochondria, including the mitochondrial genome, into daughter cells after mitosis or meiosis, mediated by interactions between mitochondria and the cytoskeleton." [GOC:mcc, PMID:10873824, PMID:11389764]
synonym: "mitochondrial inheritance" EXACT []
is_a: GO:0048308 ! organelle inheritance

[Term]
id: GO:0005634
name: nucleus
namespace: cellular_component
alt_id: GO:0005635
def: "A membrane-bounded organelle of eukaryotic cells in which chromosomes are housed and replicated." [GOC:go_curators]
synonym: "cell nucleus" EXACT []
is_a: GO:0043231 ! intracellular membrane-bounded organelle

[Term]
id: GO:0005636
name: obsolete nuclear part
namespace: cellular_component
is_obsolete: true
consider: GO:0005634

[Term]
id: GO:0043231
name: intracellular membrane-bounded organelle
namespace: cellular_component
relationship: part_of GO:0005634 ! nucleus

[Term]
id: GO:0048308
name: organelle inheritance
namespace: biological_process
"#;

/// Write `text` to `dir/name` and return the path.
pub fn write_temp_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write temp file");
    path
}

/// Serialize a term back into a `[Term]` stanza.
///
/// Scalar fields come first in schema order, followed by the tag list as
/// stored. Values are written unescaped, so only plain fixtures round-trip.
pub fn term_to_obo(term: &Term) -> String {
    let mut out = String::from("[Term]\n");
    let _ = writeln!(out, "id: {}", term.id);
    if let Some(name) = &term.name {
        let _ = writeln!(out, "name: {name}");
    }
    if let Some(namespace) = &term.namespace {
        let _ = writeln!(out, "namespace: {namespace}");
    }
    if let Some(def) = &term.def {
        let _ = writeln!(out, "def: \"{def}\" []");
    }
    if let Some(comment) = &term.comment {
        let _ = writeln!(out, "comment: {comment}");
    }
    for tag in &term.tags {
        let _ = write!(out, "{}: {}", tag.name, tag.value);
        if let Some(modifier) = &tag.modifier {
            let _ = write!(out, " {modifier}");
        }
        if let Some(comment) = &tag.comment {
            let _ = write!(out, " ! {comment}");
        }
        out.push('\n');
    }
    out
}
