//! foldertree: assemble a directory of data files into one nested tree
//!
//! Every directory becomes a node, every matching file becomes an entry
//! holding its loaded value. Options control filtering, renaming, name and
//! parent attributes, index files, grouping keys and flattening.
//!
//! Architecture:
//! - `domain`: tree model, options and the builder
//! - `application`: services orchestrating build and rendering
//! - `infrastructure`: filesystem listing, unit loading, wiring
//! - `cli`: command line interface

use std::path::Path;

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{FolderTree, TreeBuilder, TreeError, TreeOptions, TreeResult, Value};

/// Build the tree rooted at `root` from the real filesystem.
pub fn build(root: impl AsRef<Path>, options: &TreeOptions) -> TreeResult<FolderTree> {
    TreeBuilder::default().build(root.as_ref(), options)
}
