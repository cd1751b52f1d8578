use log::debug;
use parking_lot::RwLock;
use shared::models::NodeSnapshot;
use std::collections::{BTreeSet, HashMap};

/// Latest snapshot per host name. No history is kept.
#[derive(Default)]
pub struct NodeStore {
    nodes: RwLock<HashMap<String, NodeSnapshot>>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_node(&self, node: NodeSnapshot) {
        debug!("Storing snapshot for {} ({})", node.name, node.status);
        self.nodes.write().insert(node.name.clone(), node);
    }

    pub fn get_node(&self, name: &str) -> Option<NodeSnapshot> {
        self.nodes.read().get(name).cloned()
    }

    /// All snapshots, ordered by name.
    pub fn list_nodes(&self) -> Vec<NodeSnapshot> {
        let mut nodes: Vec<NodeSnapshot> = self.nodes.read().values().cloned().collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    /// Snapshots in `namespace`; an empty namespace lists everything.
    pub fn list_nodes_by_namespace(&self, namespace: &str) -> Vec<NodeSnapshot> {
        if namespace.is_empty() {
            return self.list_nodes();
        }
        let mut nodes: Vec<NodeSnapshot> = self
            .nodes
            .read()
            .values()
            .filter(|node| node.namespace == namespace)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    /// Distinct non-empty namespaces, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        self.nodes
            .read()
            .values()
            .filter(|node| !node.namespace.is_empty())
            .map(|node| node.namespace.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}
