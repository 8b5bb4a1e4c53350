//! Tree service
//!
//! Builds a folder tree with the configured collaborators and renders it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{FolderTree, TreeBuilder, TreeNodeConvert, TreeOptions};
use crate::infrastructure::traits::{EntryLoader, Lister};

/// Serialization used by `build` output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Toml => write!(f, "toml"),
        }
    }
}

/// Service for building and rendering folder trees.
pub struct TreeService {
    builder: TreeBuilder,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(lister: Arc<dyn Lister>, loader: Arc<dyn EntryLoader>) -> Self {
        Self {
            builder: TreeBuilder::new(lister, loader),
        }
    }

    /// Build the tree rooted at `root`.
    pub fn build(&self, root: &Path, options: &TreeOptions) -> ApplicationResult<FolderTree> {
        debug!("build: root={}", root.display());
        Ok(self.builder.build(root, options)?)
    }

    /// Serialize a built tree.
    pub fn render(&self, tree: &FolderTree, format: OutputFormat) -> ApplicationResult<String> {
        let json = tree.to_json();
        let rendered = match format {
            OutputFormat::Json => serde_json::to_string_pretty(&json).map_err(render_err)?,
            OutputFormat::Yaml => serde_yaml::to_string(&json).map_err(render_err)?,
            OutputFormat::Toml => toml::to_string_pretty(&json).map_err(render_err)?,
        };
        Ok(rendered)
    }

    /// Terminal outline of a built tree.
    pub fn outline(&self, tree: &FolderTree) -> String {
        tree.to_tree_string().to_string()
    }
}

fn render_err(e: impl fmt::Display) -> ApplicationError {
    ApplicationError::Render {
        message: e.to_string(),
    }
}
