//! Access methods: how a query's source name becomes a [`LineSource`].

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use crate::stream::source::{BufferedSource, LineSource};

/// Resolves a source name to a line source.
pub trait AccessMethod {
    fn name(&self) -> &str;

    /// Whether every `fetch` returns a fresh source holding one record.
    ///
    /// The reader re-fetches such sources before each record after the first.
    fn single_record(&self) -> bool {
        false
    }

    /// Open `target`. `Ok(None)` means there is nothing (more) to read.
    fn fetch(&mut self, target: &str) -> io::Result<Option<Box<dyn LineSource>>>;
}

/// Reads files, relative to an optional base directory.
#[derive(Debug, Default, Clone)]
pub struct FileAccess {
    base: Option<PathBuf>,
}

impl FileAccess {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative targets against `base`.
    #[must_use]
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// The path a target names.
    #[must_use]
    pub fn resolve(&self, target: &str) -> PathBuf {
        match &self.base {
            Some(base) => base.join(target),
            None => PathBuf::from(target),
        }
    }
}

impl AccessMethod for FileAccess {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&mut self, target: &str) -> io::Result<Option<Box<dyn LineSource>>> {
        let source = BufferedSource::open(&self.resolve(target))?;
        Ok(Some(Box::new(source)))
    }
}

/// Serves named texts held in memory.
///
/// In single-record mode each name holds a queue of records and every
/// `fetch` hands out the next one.
#[derive(Debug, Default, Clone)]
pub struct MemoryAccess {
    entries: HashMap<String, Vec<String>>,
    single_record: bool,
}

impl MemoryAccess {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An access method that serves one record per fetch.
    #[must_use]
    pub fn single_record() -> Self {
        Self {
            entries: HashMap::new(),
            single_record: true,
        }
    }

    /// Add a text (or, in single-record mode, one more record) under `name`.
    #[must_use]
    pub fn with(mut self, name: &str, text: &str) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: &str, text: &str) {
        self.entries
            .entry(name.to_owned())
            .or_default()
            .push(text.to_owned());
    }
}

impl AccessMethod for MemoryAccess {
    fn name(&self) -> &str {
        "memory"
    }

    fn single_record(&self) -> bool {
        self.single_record
    }

    fn fetch(&mut self, target: &str) -> io::Result<Option<Box<dyn LineSource>>> {
        let Some(texts) = self.entries.get_mut(target) else {
            if self.single_record {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no in-memory source named '{target}'"),
            ));
        };
        let text = if self.single_record {
            if texts.is_empty() {
                return Ok(None);
            }
            texts.remove(0)
        } else {
            texts.concat()
        };
        Ok(Some(Box::new(BufferedSource::from_text(target, &text))))
    }
}
