use generational_arena::Arena;
use std::path::{Path, PathBuf};
use tracing::instrument;

use crate::domain::value::{Mapping, NodeId, Value};
use crate::util::path::relative_display;

/// Folder node in the arena-based tree.
#[derive(Debug)]
pub struct FolderNode {
    /// Directory this node was built from
    pub path: PathBuf,
    /// Enclosing folder node, None for the root
    pub parent: Option<NodeId>,
    /// Child folder nodes still linked into this tree
    pub children: Vec<NodeId>,
    /// Display name -> loaded value or folder link
    pub entries: Mapping,
}

/// Arena-based tree produced by one build.
///
/// Folder values refer to nodes by [`NodeId`]; parent attributes hold the id
/// of the enclosing node, so the containment graph stays acyclic.
#[derive(Debug)]
pub struct FolderTree {
    arena: Arena<FolderNode>,
    root: Option<NodeId>,
}

impl Default for FolderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert an empty node. Without a parent it becomes the root.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, path: PathBuf, parent: Option<NodeId>) -> NodeId {
        let node = FolderNode {
            path,
            parent,
            children: Vec::new(),
            entries: Mapping::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// Detach a node from its parent and drop it from the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_node(&mut self, idx: NodeId) -> Option<FolderNode> {
        let node = self.arena.remove(idx)?;
        if let Some(parent_idx) = node.parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&child| child != idx);
            }
        }
        if self.root == Some(idx) {
            self.root = None;
        }
        Some(node)
    }

    /// Remove a node together with all its descendants; returns how many
    /// nodes were dropped.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, idx: NodeId) -> usize {
        let Some(node) = self.remove_node(idx) else {
            return 0;
        };
        let mut removed = 1;
        let mut pending = node.children;
        while let Some(child) = pending.pop() {
            if let Some(child_node) = self.arena.remove(child) {
                removed += 1;
                pending.extend(child_node.children);
            }
        }
        removed
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&FolderNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut FolderNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_node(&self) -> Option<&FolderNode> {
        self.root.and_then(|idx| self.get_node(idx))
    }

    /// Number of folder nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Walk `keys` from the root through mappings and folder links.
    pub fn get(&self, keys: &[&str]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.root_node()?.entries.get(*first)?;
        for key in rest {
            current = self.entries_of(current)?.get(*key)?;
        }
        Some(current)
    }

    /// Mapping behind a `Map` value or a `Folder` link.
    pub fn entries_of<'a>(&'a self, value: &'a Value) -> Option<&'a Mapping> {
        match value {
            Value::Map(map) => Some(map),
            Value::Folder(idx) => self.get_node(*idx).map(|node| &node.entries),
            _ => None,
        }
    }

    /// Node a `Parent` back-reference points at.
    pub fn parent_of(&self, value: &Value) -> Option<&FolderNode> {
        match value {
            Value::Parent(idx) => self.get_node(*idx),
            _ => None,
        }
    }

    /// Directory of `idx` relative to the root directory, `.` for the root.
    pub fn display_path(&self, idx: NodeId) -> String {
        let Some(node) = self.get_node(idx) else {
            return String::new();
        };
        match self.root_node() {
            Some(root) => relative_display(&node.path, &root.path),
            None => node.path.display().to_string(),
        }
    }

    /// Root directory of the build.
    pub fn root_path(&self) -> Option<&Path> {
        self.root_node().map(|node| node.path.as_path())
    }
}

/// Pre-order walk over the folder nodes.
pub struct TreeIterator<'a> {
    tree: &'a FolderTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a FolderTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a FolderNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (FolderTree, NodeId, NodeId, NodeId) {
        let mut tree = FolderTree::new();
        let root = tree.insert_node(PathBuf::from("/data"), None);
        let h = tree.insert_node(PathBuf::from("/data/h"), Some(root));
        let l = tree.insert_node(PathBuf::from("/data/h/l"), Some(h));
        tree.get_node_mut(root)
            .unwrap()
            .entries
            .insert("h".into(), Value::Folder(h));
        tree.get_node_mut(h)
            .unwrap()
            .entries
            .insert("l".into(), Value::Folder(l));
        tree.get_node_mut(l)
            .unwrap()
            .entries
            .insert("n".into(), Value::from(13));
        (tree, root, h, l)
    }

    #[test]
    fn given_nested_nodes_when_walking_keys_then_follows_folder_links() {
        let (tree, ..) = sample();

        assert_eq!(tree.get(&["h", "l", "n"]), Some(&Value::from(13)));
        assert_eq!(tree.get(&["h", "missing"]), None);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_removed_node_when_iterating_then_parent_no_longer_lists_it() {
        let (mut tree, root, h, l) = sample();

        let removed = tree.remove_node(l).unwrap();

        assert_eq!(removed.path, PathBuf::from("/data/h/l"));
        assert!(tree.get_node(h).unwrap().children.is_empty());
        let visited: Vec<_> = tree.iter().map(|(idx, _)| idx).collect();
        assert_eq!(visited, vec![root, h]);
    }

    #[test]
    fn given_subtree_when_removing_then_descendants_dropped() {
        let (mut tree, root, h, l) = sample();

        let removed = tree.remove_subtree(h);

        assert_eq!(removed, 2);
        assert_eq!(tree.len(), 1);
        assert!(tree.get_node(l).is_none());
        assert!(tree.get_node(root).unwrap().children.is_empty());
        assert_eq!(tree.remove_subtree(h), 0);
    }

    #[test]
    fn given_nodes_when_display_path_then_relative_to_root() {
        let (tree, root, _, l) = sample();

        assert_eq!(tree.display_path(root), ".");
        assert_eq!(tree.display_path(l), "h/l");
    }
}
