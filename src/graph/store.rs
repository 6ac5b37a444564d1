//! The authoritative node/edge store for one open session.

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use super::changes::{apply_edge_changes, apply_node_changes, EdgeChange, NodeChange};
use super::edge::{Connection, Edge, EdgeStyle};
use crate::node::{GeneratorData, Node, NodeData, SourceData, SynthesizerData, TranslatorData};
use crate::types::{EdgeId, NodeId, NodeKind};

/// Errors raised by graph mutation operations.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// A node with this id is already present.
    #[error("duplicate node id: {id}")]
    #[diagnostic(
        code(launchloom::graph::duplicate_node),
        help("Node ids are generated at creation; never re-add an existing node.")
    )]
    DuplicateNode { id: NodeId },

    /// An edge between this pair already exists.
    #[error("edge {from} -> {target} already exists")]
    #[diagnostic(
        code(launchloom::graph::duplicate_edge),
        help("Parallel edges with identical endpoints carry no extra meaning and are rejected.")
    )]
    DuplicateEdge { from: NodeId, target: NodeId },

    /// The referenced node is not in the graph.
    #[error("unknown node: {id}")]
    #[diagnostic(code(launchloom::graph::unknown_node))]
    UnknownNode { id: NodeId },

    /// The node exists but is of a different kind than the operation expects.
    #[error("node {id} is a {found}, expected a {expected}")]
    #[diagnostic(code(launchloom::graph::kind_mismatch))]
    KindMismatch {
        id: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },
}

/// Single source of truth for the live node and edge sequences.
///
/// The store is a plain owned value: the session component that owns it
/// passes it by reference into controllers, so nothing about it is
/// process-global and two sessions can never leak state into each other.
///
/// # Removal policy
///
/// Removing a node cascade-deletes its incident edges; downstream nodes are
/// left orphaned but intact, so already-computed results stay inspectable.
///
/// # Duplicate edges
///
/// [`connect`](Self::connect) and [`add_edge`](Self::add_edge) both reject
/// an edge whose `{source, target}` pair already exists; repeated connect
/// gestures on a canvas otherwise pile up parallel edges with identical
/// semantics.
///
/// # Examples
///
/// ```rust
/// use launchloom::graph::{Connection, GraphStore};
/// use launchloom::node::Node;
/// use launchloom::types::Position;
///
/// let mut store = GraphStore::default();
/// let node = Node::source("acme/demo", Position::default());
/// let id = node.id.clone();
/// store.add_node(node).unwrap();
/// assert!(store.node(&id).is_some());
/// assert!(store.edges().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current node sequence, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Current edge sequence, in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The edge between a pair of nodes, if present.
    #[must_use]
    pub fn edge_between(&self, source: &NodeId, target: &NodeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| &e.source == source && &e.target == target)
    }

    /// All edges leaving the given node.
    pub fn edges_from<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| &e.source == id)
    }

    /// Wholesale replace of the node sequence, used on session load.
    ///
    /// No validation is performed; a snapshot with dangling edge endpoints
    /// is accepted silently and only surfaces when an operation touches the
    /// missing node.
    pub fn replace_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
    }

    /// Wholesale replace of the edge sequence, used on session load.
    pub fn replace_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    /// Applies a batch of incremental node changes.
    ///
    /// Removed nodes take their incident edges with them; see the removal
    /// policy above.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
        let removed: Vec<NodeId> = changes
            .iter()
            .filter_map(|c| match c {
                NodeChange::Remove { id } => Some(id.clone()),
                _ => None,
            })
            .collect();

        self.nodes = apply_node_changes(changes, std::mem::take(&mut self.nodes));
        if !removed.is_empty() {
            self.edges
                .retain(|e| !removed.contains(&e.source) && !removed.contains(&e.target));
            debug!(removed = removed.len(), "removed nodes and incident edges");
        }
    }

    /// Applies a batch of incremental edge changes.
    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) {
        self.edges = apply_edge_changes(changes, std::mem::take(&mut self.edges));
    }

    /// Appends a node; rejects an id collision.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateNode { id: node.id });
        }
        debug!(id = %node.id, kind = %node.kind, "node added");
        self.nodes.push(node);
        Ok(())
    }

    /// Connects two existing nodes, synthesizing the edge id and deriving
    /// the style from the target's kind.
    pub fn connect(&mut self, connection: Connection) -> Result<EdgeId, GraphError> {
        let Connection { source, target } = connection;
        let target_kind = self
            .node(&target)
            .ok_or_else(|| GraphError::UnknownNode { id: target.clone() })?
            .kind;
        if !self.contains_node(&source) {
            return Err(GraphError::UnknownNode { id: source });
        }
        let edge = Edge::new(source, target, EdgeStyle::for_target(target_kind));
        let id = edge.id.clone();
        self.add_edge(edge)?;
        Ok(id)
    }

    /// Appends a fully specified edge; rejects duplicate ids, duplicate
    /// `{source, target}` pairs, and unknown endpoints.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if !self.contains_node(&edge.source) {
            return Err(GraphError::UnknownNode { id: edge.source });
        }
        if !self.contains_node(&edge.target) {
            return Err(GraphError::UnknownNode { id: edge.target });
        }
        if self.edge_between(&edge.source, &edge.target).is_some()
            || self.edges.iter().any(|e| e.id == edge.id)
        {
            return Err(GraphError::DuplicateEdge {
                from: edge.source,
                target: edge.target,
            });
        }
        debug!(id = %edge.id, "edge added");
        self.edges.push(edge);
        Ok(())
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, GraphError> {
        self.nodes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| GraphError::UnknownNode { id: id.clone() })
    }

    fn expect_kind(node: &Node, expected: NodeKind) -> Result<(), GraphError> {
        if node.kind == expected {
            Ok(())
        } else {
            Err(GraphError::KindMismatch {
                id: node.id.clone(),
                expected,
                found: node.kind,
            })
        }
    }

    /// Typed read access to a source payload.
    pub fn source(&self, id: &NodeId) -> Result<&SourceData, GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::UnknownNode { id: id.clone() })?;
        Self::expect_kind(node, NodeKind::Source)?;
        match &node.data {
            NodeData::Source(d) => Ok(d),
            _ => unreachable!("kind checked above"),
        }
    }

    /// Typed read access to a generator payload.
    pub fn generator(&self, id: &NodeId) -> Result<&GeneratorData, GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::UnknownNode { id: id.clone() })?;
        Self::expect_kind(node, NodeKind::Generator)?;
        match &node.data {
            NodeData::Generator(d) => Ok(d),
            _ => unreachable!("kind checked above"),
        }
    }

    /// Typed read access to a translator payload.
    pub fn translator(&self, id: &NodeId) -> Result<&TranslatorData, GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::UnknownNode { id: id.clone() })?;
        Self::expect_kind(node, NodeKind::Translator)?;
        match &node.data {
            NodeData::Translator(d) => Ok(d),
            _ => unreachable!("kind checked above"),
        }
    }

    /// Typed read access to a synthesizer payload.
    pub fn synthesizer(&self, id: &NodeId) -> Result<&SynthesizerData, GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::UnknownNode { id: id.clone() })?;
        Self::expect_kind(node, NodeKind::Synthesizer)?;
        match &node.data {
            NodeData::Synthesizer(d) => Ok(d),
            _ => unreachable!("kind checked above"),
        }
    }

    pub(crate) fn source_mut(&mut self, id: &NodeId) -> Result<&mut SourceData, GraphError> {
        let node = self.node_mut(id)?;
        Self::expect_kind(node, NodeKind::Source)?;
        match &mut node.data {
            NodeData::Source(d) => Ok(d),
            _ => unreachable!("kind checked above"),
        }
    }

    pub(crate) fn generator_mut(&mut self, id: &NodeId) -> Result<&mut GeneratorData, GraphError> {
        let node = self.node_mut(id)?;
        Self::expect_kind(node, NodeKind::Generator)?;
        match &mut node.data {
            NodeData::Generator(d) => Ok(d),
            _ => unreachable!("kind checked above"),
        }
    }

    pub(crate) fn translator_mut(
        &mut self,
        id: &NodeId,
    ) -> Result<&mut TranslatorData, GraphError> {
        let node = self.node_mut(id)?;
        Self::expect_kind(node, NodeKind::Translator)?;
        match &mut node.data {
            NodeData::Translator(d) => Ok(d),
            _ => unreachable!("kind checked above"),
        }
    }

    pub(crate) fn synthesizer_mut(
        &mut self,
        id: &NodeId,
    ) -> Result<&mut SynthesizerData, GraphError> {
        let node = self.node_mut(id)?;
        Self::expect_kind(node, NodeKind::Synthesizer)?;
        match &mut node.data {
            NodeData::Synthesizer(d) => Ok(d),
            _ => unreachable!("kind checked above"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn named_source(name: &str) -> Node {
        let mut node = Node::source(format!("acme/{name}"), Position::default());
        node.id = NodeId::from(name);
        node
    }

    #[test]
    fn add_node_rejects_duplicate_id() {
        let mut store = GraphStore::new();
        store.add_node(named_source("a")).unwrap();
        let err = store.add_node(named_source("a")).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode { .. }));
        assert_eq!(store.nodes().len(), 1);
    }

    #[test]
    fn connect_synthesizes_id_and_rejects_duplicates() {
        let mut store = GraphStore::new();
        store.add_node(named_source("a")).unwrap();
        store.add_node(named_source("b")).unwrap();

        let id = store
            .connect(Connection {
                source: "a".into(),
                target: "b".into(),
            })
            .unwrap();
        assert_eq!(id.as_str(), "e-a-b");

        let err = store
            .connect(Connection {
                source: "a".into(),
                target: "b".into(),
            })
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateEdge { .. }));
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn connect_rejects_unknown_endpoints() {
        let mut store = GraphStore::new();
        store.add_node(named_source("a")).unwrap();
        let err = store
            .connect(Connection {
                source: "a".into(),
                target: "ghost".into(),
            })
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode { .. }));
    }

    #[test]
    fn removing_a_node_cascades_to_incident_edges_only() {
        let mut store = GraphStore::new();
        for name in ["a", "b", "c"] {
            store.add_node(named_source(name)).unwrap();
        }
        store
            .connect(Connection {
                source: "a".into(),
                target: "b".into(),
            })
            .unwrap();
        store
            .connect(Connection {
                source: "b".into(),
                target: "c".into(),
            })
            .unwrap();

        store.apply_node_changes(&[NodeChange::Remove { id: "b".into() }]);

        // Both incident edges are gone; the downstream node survives orphaned.
        assert!(store.edges().is_empty());
        assert!(store.contains_node(&"c".into()));
        assert!(!store.contains_node(&"b".into()));
    }

    #[test]
    fn replace_accepts_dangling_edges_silently() {
        let mut store = GraphStore::new();
        store.replace_edges(vec![Edge::new(
            "ghost-src".into(),
            "ghost-dst".into(),
            EdgeStyle::Pitch,
        )]);
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn typed_accessors_enforce_kind() {
        let mut store = GraphStore::new();
        store.add_node(named_source("a")).unwrap();
        assert!(store.source(&"a".into()).is_ok());
        let err = store.generator(&"a".into()).unwrap_err();
        assert!(matches!(err, GraphError::KindMismatch { .. }));
    }
}
