use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The file could not be opened, read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored index does not have the expected record shape.
    #[error("malformed index {path} at line {line}: {reason}")]
    MalformedIndex { path: PathBuf, line: usize, reason: String },

    /// A document source record could not be decoded.
    #[error("malformed document in {path} at line {line}: {reason}")]
    MalformedDocument { path: PathBuf, line: usize, reason: String },

    /// A queries or judgments file could not be decoded.
    #[error("malformed evaluation data in {path} at line {line}: {reason}")]
    MalformedEvaluation { path: PathBuf, line: usize, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn malformed_index(path: impl Into<PathBuf>, line: usize, reason: impl ToString) -> Self {
        Error::MalformedIndex { path: path.into(), line, reason: reason.to_string() }
    }
}
