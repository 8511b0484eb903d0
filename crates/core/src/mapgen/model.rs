//! Tree graph data and the node-unlock state machine applied as encounters are cleared.

use serde::{Deserialize, Serialize};

use crate::types::{ActionOutcome, NodeId, NodeKind};

/// `connections` point backward: the row-below nodes whose completion unlocks this one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub row: u8,
    pub col: u8,
    pub connections: Vec<NodeId>,
    pub completed: bool,
    pub available: bool,
}

impl TreeNode {
    pub(crate) fn new(row: u8, col: u8, kind: NodeKind, connections: Vec<NodeId>) -> Self {
        Self {
            id: NodeId { row, col },
            kind,
            row,
            col,
            connections,
            completed: false,
            available: row == 0,
        }
    }

    pub fn is_locked(&self) -> bool {
        !self.available && !self.completed
    }
}

/// One run's encounter graph, nodes ordered by `(row, col)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn from_nodes(mut nodes: Vec<TreeNode>) -> Self {
        nodes.sort_by_key(|node| node.id);
        Self { nodes }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<TreeNode> {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.binary_search_by_key(&id, |node| node.id).ok().map(|index| &self.nodes[index])
    }

    pub fn row(&self, row: u8) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes.iter().filter(move |node| node.row == row)
    }

    pub fn row_count(&self) -> u8 {
        self.nodes.last().map_or(0, |node| node.row + 1)
    }

    pub fn boss(&self) -> Option<&TreeNode> {
        self.nodes.iter().find(|node| node.kind == NodeKind::Boss)
    }

    pub fn is_available(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.available)
    }

    pub fn completed_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|node| node.completed).map(|node| node.id).collect()
    }

    /// Clears `id`: it becomes completed, its row siblings lock, and next-row nodes that
    /// list it as a predecessor unlock. Only the current row is locked; rows passed
    /// earlier keep whatever state they already had.
    pub fn complete_node(&mut self, id: NodeId) -> ActionOutcome {
        if !self.is_available(id) {
            return ActionOutcome::Ignored;
        }

        for node in &mut self.nodes {
            if node.id == id {
                node.completed = true;
                node.available = false;
            } else if node.row == id.row {
                node.available = false;
            } else if node.row == id.row + 1 && node.connections.contains(&id) {
                node.available = true;
            }
        }
        ActionOutcome::Applied
    }
}
