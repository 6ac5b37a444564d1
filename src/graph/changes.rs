//! Incremental change descriptors for an interactive diagram surface.
//!
//! A canvas reports structural interaction (drag, select, delete) as batches
//! of change descriptors rather than mutating the graph directly. Applying a
//! batch produces a new sequence; untouched elements keep their relative
//! order, and an empty batch is the identity.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::edge::Edge;
use crate::node::Node;
use crate::types::{EdgeId, NodeId, Position};

/// One incremental change to the node sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NodeChange {
    /// Drag interaction moved a node.
    Move { id: NodeId, position: Position },
    /// Selection state toggled.
    Select { id: NodeId, selected: bool },
    /// Node deleted from the canvas.
    Remove { id: NodeId },
}

/// One incremental change to the edge sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EdgeChange {
    Select { id: EdgeId, selected: bool },
    Remove { id: EdgeId },
}

/// Applies a batch of node changes, producing the new sequence.
///
/// Changes referencing unknown ids are ignored. Within one batch, later
/// changes for the same node win.
#[must_use]
pub fn apply_node_changes(changes: &[NodeChange], nodes: Vec<Node>) -> Vec<Node> {
    if changes.is_empty() {
        return nodes;
    }

    let removed: FxHashSet<&NodeId> = changes
        .iter()
        .filter_map(|c| match c {
            NodeChange::Remove { id } => Some(id),
            _ => None,
        })
        .collect();

    nodes
        .into_iter()
        .filter(|node| !removed.contains(&node.id))
        .map(|mut node| {
            for change in changes {
                match change {
                    NodeChange::Move { id, position } if *id == node.id => {
                        node.position = *position;
                    }
                    NodeChange::Select { id, selected } if *id == node.id => {
                        node.selected = *selected;
                    }
                    _ => {}
                }
            }
            node
        })
        .collect()
}

/// Applies a batch of edge changes, producing the new sequence.
#[must_use]
pub fn apply_edge_changes(changes: &[EdgeChange], edges: Vec<Edge>) -> Vec<Edge> {
    if changes.is_empty() {
        return edges;
    }

    let removed: FxHashSet<&EdgeId> = changes
        .iter()
        .filter_map(|c| match c {
            EdgeChange::Remove { id } => Some(id),
            _ => None,
        })
        .collect();

    edges
        .into_iter()
        .filter(|edge| !removed.contains(&edge.id))
        .map(|mut edge| {
            for change in changes {
                if let EdgeChange::Select { id, selected } = change {
                    if *id == edge.id {
                        edge.selected = *selected;
                    }
                }
            }
            edge
        })
        .collect()
}
