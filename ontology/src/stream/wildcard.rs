//! Wildcard patterns: `*` matches any run, `?` one character.

use regex::{Regex, RegexBuilder};

/// A compiled wildcard pattern.
///
/// Both a case-sensitive and a case-folding regex are built up front so a
/// query can test one pattern against several fields.
#[derive(Debug, Clone)]
pub struct Wildcard {
    pattern: String,
    exact: Regex,
    folded: Regex,
}

impl Wildcard {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = format!(r"\A(?s:{})\z", translate(pattern));
        Ok(Self {
            pattern: pattern.to_owned(),
            exact: Regex::new(&anchored)?,
            folded: RegexBuilder::new(&anchored).case_insensitive(true).build()?,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Match the whole of `text`.
    #[must_use]
    pub fn matches(&self, text: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            self.exact.is_match(text)
        } else {
            self.folded.is_match(text)
        }
    }

    /// Match any word of `text`, ignoring case.
    ///
    /// Words are whitespace-separated and tried both as written and with
    /// leading and trailing punctuation removed, so `nucleus,` is `nucleus`.
    #[must_use]
    pub fn matches_any_word(&self, text: &str) -> bool {
        text.split_whitespace().any(|word| {
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
            self.folded.is_match(word) || (bare.len() < word.len() && self.folded.is_match(bare))
        })
    }
}

fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut literal = [0_u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut literal))),
        }
    }
    out
}
