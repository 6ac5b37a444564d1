//! Graph store and structural change semantics.
//!
//! The graph is an ordered sequence of [`Node`](crate::node::Node)s and an
//! ordered sequence of [`Edge`]s. [`GraphStore`] holds the authoritative
//! sequences for one open session and exposes the primitive operations the
//! rest of the crate composes into higher-level behavior: wholesale
//! replacement on session load, incremental change application from a
//! diagram surface, and validated node/edge insertion.
//!
//! The graph has no global state machine; each node carries its own local
//! lifecycle (see [`StagePhase`](crate::node::StagePhase)) independently per
//! parameter key.
//!
//! # Quick Start
//!
//! ```rust
//! use launchloom::graph::{Connection, GraphStore, NodeChange};
//! use launchloom::node::Node;
//! use launchloom::types::Position;
//!
//! let mut store = GraphStore::new();
//!
//! let source = Node::source("https://github.com/acme/demo", Position::new(100.0, 100.0));
//! let source_id = source.id.clone();
//! store.add_node(source).unwrap();
//!
//! // Drag interaction reports a batch of changes.
//! store.apply_node_changes(&[NodeChange::Move {
//!     id: source_id.clone(),
//!     position: Position::new(220.0, 140.0),
//! }]);
//! assert_eq!(store.node(&source_id).unwrap().position.x, 220.0);
//! ```

mod changes;
mod edge;
mod store;

pub use changes::{apply_edge_changes, apply_node_changes, EdgeChange, NodeChange};
pub use edge::{Connection, Edge, EdgeStyle};
pub use store::{GraphError, GraphStore};
