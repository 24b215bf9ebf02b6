use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, PoisonError, RwLock},
};

use log::debug;
use opcx_types::NodeId;

use crate::{error::NodeError, Node};

/// The nodes a server exposes, keyed by node id.
#[derive(Default)]
pub struct NodeMap {
    nodes: RwLock<HashMap<NodeId, Arc<Node>>>,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node`, failing if a node with the same id is already present.
    pub fn insert(&self, node: Node) -> Result<Arc<Node>, NodeError> {
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        match nodes.entry(node.id().clone()) {
            Entry::Occupied(entry) => Err(NodeError::DuplicateNode(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!("Added {node:?}");
                Ok(entry.insert(Arc::new(node)).clone())
            }
        }
    }

    pub fn remove(&self, node_id: &NodeId) -> Option<Arc<Node>> {
        self.nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(node_id)
    }

    pub fn get(&self, node_id: &NodeId) -> Option<Arc<Node>> {
        self.nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(node_id)
            .cloned()
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
