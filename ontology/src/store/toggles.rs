//! Validation toggles.
//!
//! Parsed from a comma-separated string such as `noidorder,nounkid`.
//! Recognised tokens:
//!
//! - `none` - disable every optional check, including both cross-reference passes
//! - `noidorder` - skip id ordering checks
//! - `nounkid` - skip "Unknown id" checks
//! - `nomultisynonym` - allow one synonym to name several terms silently

/// Which optional checks the loader runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationToggles {
    pub id_order: bool,
    pub unknown_ids: bool,
    pub multi_synonym: bool,
    pub cross_references: bool,
}

impl Default for ValidationToggles {
    fn default() -> Self {
        Self {
            id_order: true,
            unknown_ids: true,
            multi_synonym: true,
            cross_references: true,
        }
    }
}

impl ValidationToggles {
    /// Every optional check disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            id_order: false,
            unknown_ids: false,
            multi_synonym: false,
            cross_references: false,
        }
    }

    /// Parse a toggle string.
    ///
    /// Returns the toggles and every token that was not recognised. Blank
    /// tokens are skipped.
    #[must_use]
    pub fn parse(spec: &str) -> (Self, Vec<String>) {
        let mut toggles = Self::default();
        let mut unknown = Vec::new();
        for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "none" => toggles = Self::none(),
                "noidorder" => toggles.id_order = false,
                "nounkid" => toggles.unknown_ids = false,
                "nomultisynonym" => toggles.multi_synonym = false,
                _ => unknown.push(token.to_owned()),
            }
        }
        (toggles, unknown)
    }
}
