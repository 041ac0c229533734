use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SrtError>;

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    SequenceNumber,
    TimeRange,
    Text,
}

impl fmt::Display for Expected {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expected::SequenceNumber => write!(fmt, "a sequence number"),
            Expected::TimeRange => write!(fmt, "a time range ('<time> --> <time>')"),
            Expected::Text => write!(fmt, "subtitle text"),
        }
    }
}

/// Broad classification of an [`SrtError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input text.
    Parse,
    /// Invalid arguments to an operation.
    Value,
    /// Storage access failed.
    Io,
}

#[derive(Debug, Error)]
pub enum SrtError {
    #[error("invalid time: '{0}'")]
    Time(String),

    #[error("line {line}: expected {expected}, found {}", describe_found(.found))]
    Parse {
        line: usize,
        expected: Expected,
        /// The offending line, or `None` at end of input.
        found: Option<String>,
    },

    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("start index {start} is after end index {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("reference entries share the in-time {time}s (entry index {index}), cannot interpolate")]
    DegenerateInterval { index: usize, time: f64 },

    #[error("the operation needs at least one entry")]
    EmptyCollection,

    #[error("an entry needs at least one line of text and no blank lines")]
    EmptyText,

    #[error("no entry starts at or after {0}s")]
    NoEntriesFrom(f64),

    #[error("cannot access '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SrtError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SrtError::Time(_) | SrtError::Parse { .. } => ErrorKind::Parse,
            SrtError::Io { .. } => ErrorKind::Io,
            _ => ErrorKind::Value,
        }
    }

    pub(crate) fn unexpected(line: usize, expected: Expected, found: Option<&str>) -> Self {
        SrtError::Parse {
            line,
            expected,
            found: found.map(String::from),
        }
    }
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(line) if line.trim().is_empty() => "an empty line".to_string(),
        Some(line) => format!("'{}'", line),
        None => "end of input".to_string(),
    }
}
