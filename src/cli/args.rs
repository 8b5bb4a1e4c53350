//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::application::services::OutputFormat;
use crate::domain::{AttributeOption, NameTransform, TreeOptions};

/// Assemble a directory of data files into one nested tree
#[derive(Parser, Debug)]
#[command(name = "foldertree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d -d -d)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the tree and print it as data
    Build {
        /// Root directory
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Show the built tree as an outline
    Tree {
        /// Root directory
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,

        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show {
        /// Root directory whose local config is merged
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,

        /// Root directory for the local config (default: cwd)
        #[arg(value_hint = ValueHint::DirPath, conflicts_with = "global")]
        dir: Option<PathBuf>,
    },

    /// Show config paths
    Path,

    /// Print config template to stdout
    Template,
}

/// Tree options settable per invocation. Unset flags keep the configured value.
#[derive(Args, Debug, Default, Clone)]
pub struct TreeArgs {
    /// Do not descend into subdirectories
    #[arg(long)]
    pub no_recurse: bool,

    /// File pattern with one capture group ("" disables filtering)
    #[arg(long, value_name = "REGEX")]
    pub filter_files: Option<String>,

    /// Folder pattern with one capture group ("" disables filtering)
    #[arg(long, value_name = "REGEX")]
    pub filter_folders: Option<String>,

    /// Rename files: identity, uppercase, lowercase, capitalize
    #[arg(long, value_name = "TRANSFORM")]
    pub file_name_transform: Option<NameTransform>,

    /// Rename folders (defaults to the file transform)
    #[arg(long, value_name = "TRANSFORM")]
    pub folder_name_transform: Option<NameTransform>,

    /// Inject file names: true, false or a key
    #[arg(long, value_name = "KEY")]
    pub file_name_attribute: Option<AttributeOption>,

    /// Inject folder names: true, false or a key
    #[arg(long, value_name = "KEY")]
    pub folder_name_attribute: Option<AttributeOption>,

    /// Inject parent references into files: true, false or a key
    #[arg(long, value_name = "KEY")]
    pub file_parent_attribute: Option<AttributeOption>,

    /// Inject parent references into folders: true, false or a key
    #[arg(long, value_name = "KEY")]
    pub folder_parent_attribute: Option<AttributeOption>,

    /// File whose mapping seeds its directory
    #[arg(long, value_name = "FILE")]
    pub index_file: Option<String>,

    /// Group files under this key
    #[arg(long, value_name = "KEY")]
    pub files_key: Option<String>,

    /// Group folders under this key
    #[arg(long, value_name = "KEY")]
    pub folders_key: Option<String>,

    /// Merge nested folders into one level
    #[arg(long)]
    pub flatten: bool,

    /// Prefix flattened keys with the folder name
    #[arg(long)]
    pub flatten_prefix: bool,

    /// Join flattened keys in camel case
    #[arg(long)]
    pub flatten_camel: bool,

    /// Join flattened keys with a separator
    #[arg(long, value_name = "SEP")]
    pub flatten_separator: Option<String>,
}

impl TreeArgs {
    /// Overlay the given flags onto configured options.
    pub fn apply(&self, options: &mut TreeOptions) {
        if self.no_recurse {
            options.recurse = false;
        }
        if let Some(pattern) = &self.filter_files {
            options.filter_files = Some(pattern.clone());
        }
        if let Some(pattern) = &self.filter_folders {
            options.filter_folders = Some(pattern.clone());
        }
        if let Some(t) = &self.file_name_transform {
            options.file_name_transform = Some(t.clone());
        }
        if let Some(t) = &self.folder_name_transform {
            options.folder_name_transform = Some(t.clone());
        }
        if let Some(a) = &self.file_name_attribute {
            options.file_name_attribute = Some(a.clone());
        }
        if let Some(a) = &self.folder_name_attribute {
            options.folder_name_attribute = Some(a.clone());
        }
        if let Some(a) = &self.file_parent_attribute {
            options.file_parent_attribute = Some(a.clone());
        }
        if let Some(a) = &self.folder_parent_attribute {
            options.folder_parent_attribute = Some(a.clone());
        }
        if let Some(index) = &self.index_file {
            options.index_file = Some(index.clone());
        }
        if let Some(key) = &self.files_key {
            options.files_key = Some(key.clone());
        }
        if let Some(key) = &self.folders_key {
            options.folders_key = Some(key.clone());
        }
        if self.flatten {
            options.flatten = true;
        }
        if self.flatten_prefix {
            options.flatten_prefix = true;
        }
        if self.flatten_camel {
            options.flatten_camel = true;
        }
        if let Some(sep) = &self.flatten_separator {
            options.flatten_separator = Some(sep.clone());
        }
    }
}
