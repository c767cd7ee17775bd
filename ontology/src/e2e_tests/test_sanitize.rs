//! Test that sanitizing an already sanitized line changes nothing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::parse::sanitize;

/// Characters a line may contain without comment, modifier or escape syntax.
const PLAIN: &[char] = &[
    'a', 'b', 'z', 'G', 'O', '0', '9', ':', ' ', ' ', '\t', '"', '[', ']', '(', ')', '-', '_', '.',
    ',', '=', 'é',
];

fn random_line(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..40);
    (0..len)
        .map(|_| PLAIN[rng.random_range(0..PLAIN.len())])
        .collect()
}

#[test]
fn test_sanitize_is_idempotent_on_plain_lines() {
    let fixed = [
        "",
        "id: GO:0005634",
        "  name: nucleus  ",
        "def: \"A membrane-bounded organelle.\" [GOC:go_curators]",
        "xref: Wikipedia:Cell_nucleus",
    ];
    for line in fixed {
        let once = sanitize(line);
        let twice = sanitize(&once.text);
        assert_eq!(once, twice, "line {line:?}");
    }

    let mut rng = StdRng::seed_from_u64(0x0b0);
    for _ in 0..500 {
        let line = random_line(&mut rng);
        let once = sanitize(&line);
        assert_eq!(sanitize(&once.text), once, "line {line:?}");
        assert!(once.comment.is_none());
        assert!(once.modifier.is_none());
    }
}

#[test]
fn test_escaped_text_is_decoded_once() {
    let once = sanitize(r"name: a\!b\Wc \{x\}");
    assert_eq!(once.text, "name: a!b c {x}");
    assert!(once.comment.is_none());
    assert!(once.modifier.is_none());
}
