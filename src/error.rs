//! Error types for dirsize
//!
//! Every variant here is local to one input path: the caller reports it and
//! moves on to the next path. Problems inside a single subtree never surface
//! as a `SizeError`; they are emitted as warnings on the diagnostic channel
//! (see [`crate::diagnostics`]).

use std::path::PathBuf;

use thiserror::Error;

/// Per-item errors produced while resolving or sizing a directory.
#[derive(Error, Debug)]
pub enum SizeError {
    /// The input does not resolve to any existing filesystem item
    #[error("Cannot find path '{}' because it does not exist.", path.display())]
    NotFound { path: PathBuf },

    /// The input names a location outside the filesystem (another provider, a URL)
    #[error("The path '{path}' is not a filesystem.")]
    NotFileSystem { path: String },

    /// A wildcard input could not be parsed as a glob pattern
    #[error("Invalid wildcard pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The reparse metadata query failed for a reason other than
    /// "not a reparse point"
    #[error("Failed to query reparse data for '{}': {source}", path.display())]
    ReparseQuery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors outside of subtree enumeration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SizeError {
    /// Short stable identifier for the error kind, used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            SizeError::NotFound { .. } => "PathNotFound",
            SizeError::NotFileSystem { .. } => "NotFileSystemProvider",
            SizeError::InvalidPattern { .. } => "InvalidPattern",
            SizeError::ReparseQuery { .. } => "ReparseQueryFailed",
            SizeError::Io(_) => "Io",
        }
    }
}
