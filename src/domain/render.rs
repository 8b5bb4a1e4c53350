//! Rendering of folder trees to JSON and terminal outlines.

use serde_json::json;
use termtree::Tree;

use crate::domain::arena::FolderTree;
use crate::domain::value::{Mapping, NodeId, Value};

/// Key used when a parent back-reference is rendered.
pub const PARENT_REF_KEY: &str = "$parent";

impl FolderTree {
    /// Plain JSON view of the tree.
    ///
    /// Folder links are expanded in place; parent back-references become
    /// `{"$parent": "<relative dir>"}` so the output stays finite.
    pub fn to_json(&self) -> serde_json::Value {
        match self.root() {
            Some(root) => self.node_json(root),
            None => serde_json::Value::Null,
        }
    }

    fn node_json(&self, idx: NodeId) -> serde_json::Value {
        match self.get_node(idx) {
            Some(node) => self.mapping_json(&node.entries),
            None => serde_json::Value::Null,
        }
    }

    fn mapping_json(&self, mapping: &Mapping) -> serde_json::Value {
        serde_json::Value::Object(
            mapping
                .iter()
                .map(|(key, value)| (key.clone(), self.value_json(value)))
                .collect(),
        )
    }

    fn value_json(&self, value: &Value) -> serde_json::Value {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(|v| self.value_json(v)).collect())
            }
            Value::Map(map) => self.mapping_json(map),
            Value::Folder(idx) => self.node_json(*idx),
            Value::Parent(idx) => json!({ PARENT_REF_KEY: self.display_path(*idx) }),
        }
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for FolderTree {
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root) = self.root_node() else {
            return Tree::new("Empty tree".to_string());
        };
        let mut tree = Tree::new(root.path.display().to_string());
        push_mapping(self, &root.entries, &mut tree);
        tree
    }
}

fn push_mapping(tree: &FolderTree, mapping: &Mapping, parent: &mut Tree<String>) {
    for (key, value) in mapping {
        match value {
            Value::Folder(idx) => {
                let mut child = Tree::new(format!("{key}/"));
                if let Some(node) = tree.get_node(*idx) {
                    push_mapping(tree, &node.entries, &mut child);
                }
                parent.push(child);
            }
            Value::Map(map) => {
                let mut child = Tree::new(key.clone());
                push_mapping(tree, map, &mut child);
                parent.push(child);
            }
            Value::Parent(idx) => {
                parent.push(Tree::new(format!("{key} -> {}", tree.display_path(*idx))));
            }
            scalar => {
                parent.push(Tree::new(format!("{key} = {scalar}")));
            }
        }
    }
}
