//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/foldertree/foldertree.toml`
//! 3. Local config: `<root>/.foldertree.toml` (the directory being built)
//! 4. Environment variables: `FOLDERTREE_*` prefix, `__` for nesting
//!
//! Tables merge key by key, so a local file that only sets `tree.flatten`
//! keeps every other option from the layers below it.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::OutputFormat;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::TreeOptions;

/// File name of the per-root config file.
pub const LOCAL_CONFIG_FILE: &str = ".foldertree.toml";

/// Unified configuration for foldertree.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Output format of `build`
    pub format: OutputFormat,
    /// Tree build options
    pub tree: TreeOptions,
}

/// Get the XDG config directory for foldertree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "foldertree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("foldertree.toml"))
}

/// Get the path to the local config file of a tree root.
pub fn local_config_path(root: &Path) -> PathBuf {
    root.join(LOCAL_CONFIG_FILE)
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `root` - Optional tree root whose `.foldertree.toml` is applied
    pub fn load(root: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_from(global_config_path().as_deref(), root)
    }

    /// Load settings from an explicit global config path.
    ///
    /// A missing file at either location is skipped.
    pub fn load_from(global: Option<&Path>, root: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_layers(global, root, None)
    }

    /// Layered load with an explicit environment; `None` reads the process
    /// environment.
    pub fn load_layers(
        global: Option<&Path>,
        root: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> ApplicationResult<Self> {
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(global_path) = global {
            builder = builder.add_source(
                File::from(global_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        if let Some(root) = root {
            builder = builder.add_source(
                File::from(local_config_path(root))
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLDERTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# foldertree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/foldertree/foldertree.toml
#   Local:  <root>/.foldertree.toml
#   Env:    FOLDERTREE_* environment variables, e.g. FOLDERTREE_TREE__FLATTEN=true
#
# Command line flags override every layer.

# Output format of `foldertree build`: json, yaml or toml
# format = "json"

[tree]
# Descend into subdirectories
# recurse = true

# Patterns with one capture group; the capture becomes the entry name.
# An empty string disables filtering.
# filter_files = '^([^.].*)\.(?:json|toml|ya?ml)$'
# filter_folders = '^([^.].*)$'

# Renaming after filtering: identity, uppercase, lowercase, capitalize
# Folders fall back to the file transform; set "identity" to opt out.
# file_name_transform = "uppercase"
# folder_name_transform = "identity"

# Inject the entry name / a parent reference into loaded mappings.
# true uses the keys "name" / "parent", a string names the key, false disables.
# file_name_attribute = true
# folder_name_attribute = false
# file_parent_attribute = "owner"

# File whose mapping seeds its directory's node
# index_file = "_index.json"

# Group files or folders under their own key
# files_key = "_files"
# folders_key = "_folders"

# Merge nested folders into one level
# flatten = false
# flatten_prefix = false
# flatten_camel = false
# flatten_separator = "_"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
