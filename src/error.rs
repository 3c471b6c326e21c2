//! Error taxonomy for snapshot and diff operations.
//!
//! Every variant here is fatal for the command that produced it. Entries
//! skipped during a walk are not errors, see [`crate::scan::walker::SkippedEntry`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::store::diff::Incomparable;

pub type Result<T> = std::result::Result<T, Error>;

/// What is wrong with a path supplied on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputProblem {
    DoesNotExist,
    NotADirectory,
    /// the canonical path cannot be a document key without loss
    NotUtf8,
}

impl fmt::Display for InputProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputProblem::DoesNotExist => f.write_str("does not exist"),
            InputProblem::NotADirectory => f.write_str("is not a directory"),
            InputProblem::NotUtf8 => f.write_str("is not valid UTF-8"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("\"{}\" {}", .path.display(), .problem)]
    InvalidInput { path: PathBuf, problem: InputProblem },

    /// metadata query failed for a reason other than permissions or a vanished entry
    #[error("failed to read \"{}\": {}", .path.display(), .source)]
    UnexpectedWalkFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("\"{}\" is not a valid snapshot: {}", .path.display(), .detail)]
    MalformedSnapshot { path: PathBuf, detail: String },

    #[error("\"{}\" is missing required field \"{}\"", .path.display(), .field)]
    MissingField { path: PathBuf, field: &'static str },

    #[error(transparent)]
    IncomparableSnapshots(#[from] Incomparable),

    #[error("failed to {} \"{}\": {}", .action, .path.display(), .source)]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file \"{}\": {}", .path.display(), .detail)]
    Config { path: PathBuf, detail: String },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { action, path, source }
    }
}
