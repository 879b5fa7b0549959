use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

use petgraph::algo::Cycle;

use crate::interval::SeqRange;

#[derive(Debug)]
pub enum SplitError {
    /// Two nodes could not be merged because their ranges for the same sequence are not adjacent
    CorruptedGraph { range_idx: usize, source: SeqRange, target_start: u32 },

    /// The interval graph is in an invalid state
    GraphError,

    /// The alignment engine was given inconsistent input
    AlignmentError(String),

    /// The configuration values are out of range
    InvalidConfig(String),

    /// None of the given files contained a sequence
    NoSequences,

    /// Error variant when we couldn't read from a file
    FileReadError { path: PathBuf, source: io::Error },

    /// Error variant when we could not serialize the graph
    SerializationError { source: serde_json::Error },

    /// Other IO errors
    IOError(io::Error),
}

impl Error for SplitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Self::FileReadError { ref source, .. } => Some(source),
            Self::SerializationError { ref source } => Some(source),
            Self::IOError(ref source) => Some(source),
            _ => None
        }
    }
}

impl<N> From<Cycle<N>> for SplitError {
    fn from(_: Cycle<N>) -> Self {
        Self::GraphError
    }
}

impl From<io::Error> for SplitError {
    fn from(value: io::Error) -> Self {
        Self::IOError(value)
    }
}

impl From<serde_json::Error> for SplitError {
    fn from(value: serde_json::Error) -> Self {
        Self::SerializationError {
            source: value
        }
    }
}

impl Display for SplitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::CorruptedGraph { range_idx, source, target_start } =>
                write!(f, "Possibly corrupted input graph (Range idx {range_idx}). Source range: [{}, {}]. \
                    Source range end was not equal to the target range start: {target_start}",
                    source.start, source.end),
            Self::GraphError =>
                write!(f, "The interval graph is in an invalid state (possibly a cycle?)."),
            Self::AlignmentError(ref msg) =>
                write!(f, "Could not build the alignment: {msg}"),
            Self::InvalidConfig(ref msg) =>
                write!(f, "Invalid configuration: {msg}"),
            Self::NoSequences =>
                write!(f, "No sequences were loaded!"),
            Self::FileReadError { ref path, source: _ } =>
                write!(f, "Could not open {} for reading!", path.display()),
            Self::SerializationError { source: _ } =>
                write!(f, "Could not serialize the graph!"),
            Self::IOError(ref err) =>
                err.fmt(f),
        }
    }
}
