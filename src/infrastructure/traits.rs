//! I/O boundary traits for testability
//!
//! The tree builder only talks to the filesystem through these two traits,
//! so tests can run it over in-memory listings and values.

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::domain::{TreeError, TreeResult, Value};

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Directory listing abstraction.
pub trait Lister: Send + Sync {
    /// List the direct children of `path`, in any order.
    ///
    /// Fails with `NotFound` for a missing path and `NotADirectory` when the
    /// path is not a directory.
    fn list(&self, path: &Path) -> TreeResult<Vec<DirEntry>>;
}

/// Resolves a file path to its loaded unit.
pub trait EntryLoader: Send + Sync {
    /// Load the unit at `path`; failures are reported as `TreeError::Load`.
    fn load(&self, path: &Path) -> TreeResult<Value>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real directory lister backed by walkdir.
#[derive(Debug, Default)]
pub struct RealLister;

impl Lister for RealLister {
    fn list(&self, path: &Path) -> TreeResult<Vec<DirEntry>> {
        if !path.exists() {
            return Err(TreeError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(TreeError::NotADirectory(path.to_path_buf()));
        }

        let mut entries = Vec::new();
        // follow_links makes is_dir describe the link target, like stat
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| TreeError::Io {
                path: e.path().unwrap_or(path).to_path_buf(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk failed")),
            })?;
            let name = entry
                .file_name()
                .to_str()
                .ok_or_else(|| TreeError::InvalidEntryName(entry.path().to_path_buf()))?
                .to_string();
            entries.push(DirEntry {
                name,
                is_dir: entry.file_type().is_dir(),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_directory_when_listing_then_reports_files_and_folders() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("f.json"), "6").unwrap();
        std::fs::create_dir(temp.path().join("h")).unwrap();
        std::fs::write(temp.path().join("h/i.json"), "9").unwrap();

        let mut entries = RealLister.list(temp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries, vec![DirEntry::file("f.json"), DirEntry::dir("h")]);
    }

    #[test]
    fn given_missing_path_when_listing_then_not_found() {
        let temp = TempDir::new().unwrap();

        let result = RealLister.list(&temp.path().join("missing"));

        assert!(matches!(result, Err(TreeError::NotFound(_))));
    }

    #[test]
    fn given_file_path_when_listing_then_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.json");
        std::fs::write(&file, "6").unwrap();

        let result = RealLister.list(&file);

        assert!(matches!(result, Err(TreeError::NotADirectory(_))));
    }
}
