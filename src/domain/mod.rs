//! Domain layer: the folder tree model and its builder
//!
//! The builder reaches the filesystem only through the `Lister` and
//! `EntryLoader` traits from the infrastructure layer.

pub mod arena;
pub mod builder;
pub mod error;
pub mod options;
pub mod render;
pub mod value;

pub use arena::{FolderNode, FolderTree, TreeIterator};
pub use builder::TreeBuilder;
pub use error::{TreeError, TreeResult};
pub use options::{
    AttributeOption, BuildConfig, ComposeFn, FlattenNaming, NameFilter, NameFn, NameTransform,
    TreeOptions,
};
pub use render::TreeNodeConvert;
pub use value::{Mapping, NodeId, Value};
