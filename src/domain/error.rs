//! Domain-level errors for tree construction

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving options or building a folder tree.
///
/// A build is all-or-nothing: the first error aborts the traversal and no
/// partial tree is returned.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("conflicting configuration: {0}")]
    ConfigConflict(String),

    #[error("index file does not load to a mapping: {0}")]
    IndexNotMapping(PathBuf),

    #[error("key '{key}' seeded by the index in {path} is not a mapping")]
    NamespaceConflict { path: PathBuf, key: String },

    #[error("entry name is not valid UTF-8: {0}")]
    InvalidEntryName(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    /// Wrap any error raised by an entry loader.
    pub fn load(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Load {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
