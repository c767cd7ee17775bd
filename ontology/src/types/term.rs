//! Terms and tags.

use serde::Serialize;

use crate::types::ids::split_id;

/// One `name: value {modifier} ! comment` line of a stanza.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Tag {
    /// The tag name, without its trailing colon.
    pub name: String,
    /// The unescaped value text.
    pub value: String,
    /// The trailing `{...}` span, braces included.
    pub modifier: Option<String>,
    /// The trailing `!` comment.
    pub comment: Option<String>,
    /// The line the tag started on.
    pub line_number: usize,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, line_number: usize) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            modifier: None,
            comment: None,
            line_number,
        }
    }

    /// The first whitespace-separated token of the value.
    #[must_use]
    pub fn first_token(&self) -> &str {
        self.value.split_whitespace().next().unwrap_or("")
    }
}

/// A `[Term]` stanza, or an alt-id stub pointing at one.
///
/// # Invariants
///
/// - `true_id` is set only on alt-id stubs; a stub has no other fields set.
/// - `db` and `local_id` are always derived from `id` by [`Term::set_id`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Term {
    /// The DB-qualified identifier, e.g. `GO:0005634`.
    pub id: String,
    /// The database prefix of `id`.
    pub db: Option<String>,
    /// The part of `id` after the database prefix.
    pub local_id: String,
    /// The `id` value exactly as written.
    pub full_id: String,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub def: Option<String>,
    pub comment: Option<String>,
    pub obsolete: bool,
    pub builtin: bool,
    /// The last `replaced_by` or `consider` target.
    pub replaced: Option<String>,
    /// For alt-id stubs, the id of the term that owns the alt id.
    pub true_id: Option<String>,
    /// Tags not absorbed into the fields above, in file order.
    pub tags: Vec<Tag>,
}

impl Term {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An alt-id stub redirecting `alt_id` to `true_id`.
    #[must_use]
    pub fn stub(alt_id: &str, true_id: &str) -> Self {
        let mut term = Self::new();
        term.set_id(alt_id, alt_id);
        term.true_id = Some(true_id.to_owned());
        term
    }

    /// Set the id, splitting it into database prefix and local part.
    pub fn set_id(&mut self, id: &str, raw: &str) {
        let parts = split_id(id);
        self.id = id.to_owned();
        self.db = parts.db.map(str::to_owned);
        self.local_id = parts.local.to_owned();
        self.full_id = raw.to_owned();
    }

    /// Reset every field, keeping allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.id.clear();
        self.db = None;
        self.local_id.clear();
        self.full_id.clear();
        self.name = None;
        self.namespace = None;
        self.def = None;
        self.comment = None;
        self.obsolete = false;
        self.builtin = false;
        self.replaced = None;
        self.true_id = None;
        self.tags.clear();
    }

    /// Whether this entry is an alt-id stub.
    #[must_use]
    pub const fn is_stub(&self) -> bool {
        self.true_id.is_some()
    }

    /// Tags with the given name, in file order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    /// The ids named by `is_a` tags.
    #[must_use]
    pub fn parent_ids(&self) -> Vec<&str> {
        self.tags_named("is_a")
            .map(Tag::first_token)
            .filter(|id| !id.is_empty())
            .collect()
    }
}
