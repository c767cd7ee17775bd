//! Tool configuration module.
//!
//! The `ontology` binary is configured from environment variables.
//!
//! # Environment Variables
//!
//! - `OBO_ONTOLOGY_FILE`: The OBO file to read (required)
//! - `OBO_VALIDATION`: Validation toggles, e.g. `noidorder,nounkid` (default: empty)
//! - `OBO_QUERY`: A selector such as `nam=nucle*`. When set, terms of the
//!   ontology file matching it are streamed instead of loading the whole file.
//!
//! # Invariants
//!
//! - `ontology_file` is never empty
//! - `query`, when set, parses as a stream query over `ontology_file`

use std::path::PathBuf;

use crate::stream::QuerySpec;

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// The ontology file to load or stream.
    pub ontology_file: PathBuf,
    /// Validation toggle string passed to the loader.
    pub validation: String,
    /// Full stream query (`file:selector`) when streaming.
    pub query: Option<String>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ToolConfig {
    pub const ONTOLOGY_FILE_VAR: &'static str = "OBO_ONTOLOGY_FILE";
    pub const VALIDATION_VAR: &'static str = "OBO_VALIDATION";
    pub const QUERY_VAR: &'static str = "OBO_QUERY";
    /// Default validation toggles: every check enabled.
    pub const DEFAULT_VALIDATION: &'static str = "";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `OBO_ONTOLOGY_FILE` is not set or is empty
    /// - `OBO_QUERY` is set but does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ontology_file = Self::load_ontology_file(&lookup)?;
        let validation = lookup(Self::VALIDATION_VAR).unwrap_or_else(|| Self::DEFAULT_VALIDATION.to_owned());
        let query = Self::load_query(&lookup, &ontology_file)?;

        Ok(Self {
            ontology_file,
            validation,
            query,
        })
    }

    fn load_ontology_file<F>(lookup: &F) -> Result<PathBuf, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = lookup(Self::ONTOLOGY_FILE_VAR)
            .ok_or_else(|| ConfigError::MissingEnvVar(Self::ONTOLOGY_FILE_VAR.to_owned()))?;

        if value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ONTOLOGY_FILE_VAR.to_owned(),
                message: "must not be empty".to_owned(),
            });
        }

        Ok(PathBuf::from(value))
    }

    /// Combine the selector with the ontology file into a stream query.
    fn load_query<F>(lookup: &F, ontology_file: &std::path::Path) -> Result<Option<String>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(selector) = lookup(Self::QUERY_VAR) else {
            return Ok(None);
        };
        let query = format!("{}:{}", ontology_file.display(), selector.trim());
        QuerySpec::parse(&query).map_err(|e| ConfigError::InvalidValue {
            name: Self::QUERY_VAR.to_owned(),
            message: e.to_string(),
        })?;
        Ok(Some(query))
    }
}
