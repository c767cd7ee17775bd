//! Identifier helpers.
//!
//! OBO identifiers are usually DB-qualified: `GO:0005634` has the database
//! prefix `GO` and the local id `0005634`. Unqualified ids (`part_of`) are
//! legal, mostly for relationship types.

/// An identifier split at its first colon.
///
/// # Invariants
///
/// - `db` is never empty when present and contains no whitespace.
/// - `local` is the text after the colon, or the whole id when unqualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParts<'a> {
    /// The database prefix, if the id is qualified.
    pub db: Option<&'a str>,
    /// The local identifier.
    pub local: &'a str,
}

/// Split an identifier into its database prefix and local part.
///
/// # Examples
///
/// ```
/// use ontology::types::ids::split_id;
/// let parts = split_id("GO:0005634");
/// assert_eq!(parts.db, Some("GO"));
/// assert_eq!(parts.local, "0005634");
///
/// let parts = split_id("part_of");
/// assert_eq!(parts.db, None);
/// assert_eq!(parts.local, "part_of");
/// ```
#[must_use]
pub fn split_id(id: &str) -> IdParts<'_> {
    match id_prefix(id) {
        Some(db) => IdParts {
            db: Some(db),
            local: &id[db.len() + 1..],
        },
        None => IdParts {
            db: None,
            local: id,
        },
    }
}

/// The database prefix of a qualified id token, if it has one.
///
/// A prefix is a non-empty run of characters other than whitespace and `:`,
/// followed by a colon and at least one more character.
#[must_use]
pub fn id_prefix(token: &str) -> Option<&str> {
    let (db, local) = token.split_once(':')?;
    if db.is_empty() || local.is_empty() || db.chars().any(char::is_whitespace) {
        return None;
    }
    Some(db)
}
