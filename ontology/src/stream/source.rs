//! Line sources for the stream reader.
//!
//! The reader never holds more than one line; format trials rely on
//! [`LineSource::checkpoint`] and [`LineSource::restore`] to rewind a source
//! to where an attempt started.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Seek, SeekFrom};
use std::path::Path;

/// A position a source can be rewound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checkpoint {
    /// Byte offset of the next unread line.
    pub offset: u64,
    /// Number of physical lines read before `offset`.
    pub line: usize,
}

/// A rewindable source of physical lines.
pub trait LineSource {
    /// Name used in diagnostics.
    fn source_name(&self) -> &str;

    /// Read the next physical line into `buffer`, line ending removed.
    ///
    /// Returns `false` at end of input, leaving `buffer` empty.
    fn read_line(&mut self, buffer: &mut String) -> io::Result<bool>;

    /// The position of the next unread line.
    fn checkpoint(&self) -> Checkpoint;

    /// Rewind (or advance) to a checkpoint taken from this source.
    fn restore(&mut self, checkpoint: Checkpoint) -> io::Result<()>;

    /// Number of the last line read.
    fn line_number(&self) -> usize {
        self.checkpoint().line
    }
}

/// A [`LineSource`] over any seekable buffered reader.
#[derive(Debug)]
pub struct BufferedSource<R> {
    name: String,
    reader: R,
    offset: u64,
    line: usize,
}

impl<R: BufRead + Seek> BufferedSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            offset: 0,
            line: 0,
        }
    }
}

impl BufferedSource<BufReader<File>> {
    /// Open a file as a line source.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(path.display().to_string(), BufReader::new(file)))
    }
}

impl BufferedSource<Cursor<Vec<u8>>> {
    /// A line source over text held in memory.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, Cursor::new(text.as_bytes().to_vec()))
    }
}

impl<R: BufRead + Seek> LineSource for BufferedSource<R> {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn read_line(&mut self, buffer: &mut String) -> io::Result<bool> {
        buffer.clear();
        let read = self.reader.read_line(buffer)?;
        if read == 0 {
            return Ok(false);
        }
        self.offset += read as u64;
        self.line += 1;
        while buffer.ends_with('\n') || buffer.ends_with('\r') {
            buffer.pop();
        }
        Ok(true)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
            line: self.line,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(checkpoint.offset))?;
        self.offset = checkpoint.offset;
        self.line = checkpoint.line;
        Ok(())
    }
}
