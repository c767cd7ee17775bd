//! Tag tokenizer: splits a stripped line into tag name and value.

/// A tokenized `name: value` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenized<'a> {
    /// The tag name with its colon removed.
    pub name: &'a str,
    /// The trimmed value text, still escaped.
    pub value: &'a str,
    /// The name token did not end in `:`.
    pub bad_name: bool,
    /// A well-formed name had no value.
    pub missing_value: bool,
}

/// Split a line on its first whitespace run.
///
/// Returns `None` for a blank line.
#[must_use]
pub fn tokenize(text: &str) -> Option<Tokenized<'_>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (token, rest) = match text.find(char::is_whitespace) {
        Some(index) => (&text[..index], text[index..].trim()),
        None => (text, ""),
    };

    let (name, bad_name) = match token.strip_suffix(':') {
        Some(name) => (name, false),
        None => (token, true),
    };

    Some(Tokenized {
        name,
        value: rest,
        bad_name,
        missing_value: !bad_name && rest.is_empty(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_name_and_value() {
        let tokens = tokenize("name:   nucleus  envelope ").expect("tokens");
        assert_eq!(tokens.name, "name");
        assert_eq!(tokens.value, "nucleus  envelope");
        assert!(!tokens.bad_name);
        assert!(!tokens.missing_value);
    }

    #[test]
    fn test_tokenize_bad_name() {
        let tokens = tokenize("name nucleus").expect("tokens");
        assert!(tokens.bad_name);
        assert_eq!(tokens.name, "name");
        assert_eq!(tokens.value, "nucleus");
        assert!(!tokens.missing_value);
    }

    #[test]
    fn test_tokenize_missing_value() {
        let tokens = tokenize("comment:").expect("tokens");
        assert_eq!(tokens.name, "comment");
        assert_eq!(tokens.value, "");
        assert!(tokens.missing_value);
    }

    #[test]
    fn test_tokenize_blank() {
        assert!(tokenize("   ").is_none());
    }

    #[test]
    fn test_tokenize_splits_on_tab() {
        let tokens = tokenize("id:\tGO:0001").expect("tokens");
        assert_eq!(tokens.name, "id");
        assert_eq!(tokens.value, "GO:0001");
    }
}
