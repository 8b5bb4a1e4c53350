//! Tree builder: turns a directory into a [`FolderTree`].

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::domain::arena::FolderTree;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::options::{BuildConfig, TreeOptions};
use crate::domain::value::{Mapping, NodeId, Value};
use crate::infrastructure::loader::FileLoader;
use crate::infrastructure::traits::{DirEntry, EntryLoader, Lister, RealLister};

/// Builds folder trees through a [`Lister`] and an [`EntryLoader`].
///
/// A build is synchronous and depth-first. Entries of every directory are
/// visited in byte order of their names, which fixes the outcome whenever
/// renaming or flattening makes two entries collide (the later one wins).
pub struct TreeBuilder {
    lister: Arc<dyn Lister>,
    loader: Arc<dyn EntryLoader>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(Arc::new(RealLister), Arc::new(FileLoader))
    }
}

impl TreeBuilder {
    pub fn new(lister: Arc<dyn Lister>, loader: Arc<dyn EntryLoader>) -> Self {
        Self { lister, loader }
    }

    /// Build the tree rooted at `root`.
    ///
    /// Options are resolved before anything is listed, so configuration
    /// conflicts surface without touching the filesystem.
    #[instrument(level = "debug", skip(self, options))]
    pub fn build(&self, root: &Path, options: &TreeOptions) -> TreeResult<FolderTree> {
        let config = options.resolve()?;
        self.build_with(root, &config)
    }

    /// Build with an already resolved configuration.
    #[instrument(level = "debug", skip(self, config))]
    pub fn build_with(&self, root: &Path, config: &BuildConfig) -> TreeResult<FolderTree> {
        let mut tree = FolderTree::new();
        self.process_folder(&mut tree, root, None, config)?;
        debug!(
            "build: {} folder nodes from {}",
            tree.len(),
            root.display()
        );
        Ok(tree)
    }

    fn process_folder(
        &self,
        tree: &mut FolderTree,
        path: &Path,
        parent: Option<NodeId>,
        config: &BuildConfig,
    ) -> TreeResult<NodeId> {
        let mut listing = self.lister.list(path)?;
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("process_folder: {} ({} entries)", path.display(), listing.len());

        let node_id = tree.insert_node(path.to_path_buf(), parent);

        let mut entries = self.seed_from_index(path, &listing, config)?;
        let mut files = take_namespace(&mut entries, config.files_key.as_deref(), path)?;
        let folders_seeded = config
            .folders_key
            .as_ref()
            .is_some_and(|key| entries.contains_key(key));
        let mut folders = take_namespace(&mut entries, config.folders_key.as_deref(), path)?;

        let mut subfolders = Vec::new();
        for entry in &listing {
            if entry.is_dir {
                subfolders.push(entry.name.as_str());
                continue;
            }
            if config.index_file.as_deref() == Some(entry.name.as_str()) {
                continue;
            }
            let Some(name) = config.file_name(&entry.name) else {
                trace!("process_folder: skip file {}", entry.name);
                continue;
            };

            let mut value = self.loader.load(&path.join(&entry.name))?;
            inject_file_attributes(config, &mut value, &name, node_id);
            destination(&mut entries, &mut files).insert(name, value);
        }

        let mut prune_folders = false;
        if config.recurse {
            let mut folders_added = 0usize;
            for raw in subfolders {
                let Some(captured) = config.folder_capture(raw) else {
                    trace!("process_folder: skip folder {}", raw);
                    continue;
                };
                let child_id = self.process_folder(tree, &path.join(raw), Some(node_id), config)?;
                let folder_name = config.folder_name(captured);

                match &config.flatten {
                    Some(naming) => {
                        let child_files = match tree.remove_node(child_id) {
                            Some(child) => files_view(child.entries, config),
                            None => Mapping::new(),
                        };
                        for (child_name, mut value) in child_files {
                            let flat_name = naming.compose(&folder_name, &child_name);
                            inject_file_attributes(config, &mut value, &flat_name, node_id);
                            destination(&mut entries, &mut files).insert(flat_name, value);
                        }
                    }
                    None => {
                        inject_folder_attributes(config, tree, child_id, &folder_name, node_id);
                        let replaced = destination(&mut entries, &mut folders)
                            .insert(folder_name, Value::Folder(child_id));
                        release_folder(tree, replaced);
                    }
                }
                folders_added += 1;
            }
            prune_folders = config.flatten.is_none() && !folders_seeded && folders_added == 0;
        }

        if let (Some(key), Some(namespace)) = (&config.files_key, files) {
            let replaced = entries.insert(key.clone(), Value::Map(namespace));
            release_folder(tree, replaced);
        }
        if let (Some(key), Some(namespace)) = (&config.folders_key, folders) {
            if !prune_folders {
                let replaced = entries.insert(key.clone(), Value::Map(namespace));
                release_folder(tree, replaced);
            }
        }

        if let Some(node) = tree.get_node_mut(node_id) {
            node.entries = entries;
        }
        Ok(node_id)
    }

    /// Initial node content: the index file's mapping, or empty.
    fn seed_from_index(
        &self,
        path: &Path,
        listing: &[DirEntry],
        config: &BuildConfig,
    ) -> TreeResult<Mapping> {
        let Some(index) = config.index_file.as_deref() else {
            return Ok(Mapping::new());
        };
        match listing.iter().find(|entry| entry.name == index) {
            Some(entry) if !entry.is_dir => {
                let index_path = path.join(index);
                match self.loader.load(&index_path)? {
                    Value::Map(seed) => Ok(seed),
                    _ => Err(TreeError::IndexNotMapping(index_path)),
                }
            }
            _ => Ok(Mapping::new()),
        }
    }
}

/// Pull a namespace mapping out of the node, creating an empty one.
fn take_namespace(
    entries: &mut Mapping,
    key: Option<&str>,
    path: &Path,
) -> TreeResult<Option<Mapping>> {
    let Some(key) = key else {
        return Ok(None);
    };
    match entries.remove(key) {
        None => Ok(Some(Mapping::new())),
        Some(Value::Map(existing)) => Ok(Some(existing)),
        Some(_) => Err(TreeError::NamespaceConflict {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
    }
}

fn destination<'a>(entries: &'a mut Mapping, namespace: &'a mut Option<Mapping>) -> &'a mut Mapping {
    match namespace {
        Some(namespace) => namespace,
        None => entries,
    }
}

/// A folder link that lost its key to a later entry no longer belongs to
/// the tree.
fn release_folder(tree: &mut FolderTree, replaced: Option<Value>) {
    if let Some(Value::Folder(orphan)) = replaced {
        let removed = tree.remove_subtree(orphan);
        debug!("release_folder: dropped {} shadowed folder nodes", removed);
    }
}

/// The part of a child node that flattening merges upward.
fn files_view(mut child_entries: Mapping, config: &BuildConfig) -> Mapping {
    match &config.files_key {
        Some(key) => match child_entries.remove(key) {
            Some(Value::Map(files)) => files,
            _ => Mapping::new(),
        },
        None => child_entries,
    }
}

fn inject_file_attributes(config: &BuildConfig, value: &mut Value, name: &str, parent: NodeId) {
    if !config.injects_file_attributes() {
        return;
    }
    if let Some(key) = &config.file_name_attribute {
        value.set_attribute(key, Value::String(name.to_string()));
    }
    if let Some(key) = &config.file_parent_attribute {
        value.set_attribute(key, Value::Parent(parent));
    }
}

fn inject_folder_attributes(
    config: &BuildConfig,
    tree: &mut FolderTree,
    child: NodeId,
    name: &str,
    parent: NodeId,
) {
    let Some(node) = tree.get_node_mut(child) else {
        return;
    };
    if let Some(key) = &config.folder_name_attribute {
        node.entries.insert(key.clone(), Value::String(name.to_string()));
    }
    if let Some(key) = &config.folder_parent_attribute {
        node.entries.insert(key.clone(), Value::Parent(parent));
    }
}
