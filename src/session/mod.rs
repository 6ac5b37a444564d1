//! Session model and persistence.
//!
//! A [`Session`] is the at-rest snapshot of one open graph: the repository
//! reference the user started from, creation/modification timestamps, and
//! the node/edge sequences. The live [`GraphStore`] owns the sequences
//! while the session is open; [`Session::capture`] replaces the snapshot
//! when the graph is explicitly saved, and [`Session::restore`] rebuilds a
//! store on load. Sessions are never deleted automatically.
//!
//! Two [`SessionStore`] backends ship with the crate:
//! [`MemorySessionStore`] for tests and ephemeral use, and (behind the
//! default `sqlite` feature) [`SqliteSessionStore`] for a client-local
//! database file.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::graph::{Edge, GraphStore};
use crate::node::Node;

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemorySessionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSessionStore;

/// Session persistence errors.
#[derive(Debug, Error, Diagnostic)]
pub enum SessionStoreError {
    #[error("JSON serialization/deserialization failed: {source}")]
    #[diagnostic(
        code(launchloom::session::serde),
        help("Ensure the stored snapshot matches the current node/edge shapes.")
    )]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    #[cfg(feature = "sqlite")]
    #[error("SQLx error: {0}")]
    #[diagnostic(
        code(launchloom::session::sqlx),
        help("Ensure the SQLite database URL is valid and writable.")
    )]
    Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, SessionStoreError>;

/// The at-rest snapshot of one graph, keyed by session id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub repo_url: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Session {
    /// Creates a fresh session for a repository reference, with an empty
    /// graph snapshot.
    #[must_use]
    pub fn new(repo_url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            repo_url: repo_url.into(),
            created_at: now,
            last_modified: now,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Replaces the snapshot with the store's current sequences and bumps
    /// `last_modified`.
    pub fn capture(&mut self, store: &GraphStore) {
        self.nodes = store.nodes().to_vec();
        self.edges = store.edges().to_vec();
        self.last_modified = Utc::now();
    }

    /// Builds a live store from the snapshot.
    ///
    /// Mirrors the load path of the graph store: the snapshot is installed
    /// wholesale with no endpoint validation.
    #[must_use]
    pub fn restore(&self) -> GraphStore {
        let mut store = GraphStore::new();
        store.replace_nodes(self.nodes.clone());
        store.replace_edges(self.edges.clone());
        store
    }
}

/// Listing row: everything but the snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub repo_url: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            repo_url: session.repo_url.clone(),
            created_at: session.created_at,
            last_modified: session.last_modified,
        }
    }
}

/// Keyed read/write of session snapshots.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session; an absent key yields `Ok(None)`.
    async fn load(&self, id: &str) -> Result<Option<Session>>;

    /// Upserts a session under its id.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Lists stored sessions, most recently modified first.
    async fn list(&self) -> Result<Vec<SessionSummary>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::types::Position;

    #[test]
    fn capture_bumps_last_modified_and_copies_sequences() {
        let mut session = Session::new("acme/demo");
        let before = session.last_modified;

        let mut store = GraphStore::new();
        store
            .add_node(Node::source("acme/demo", Position::default()))
            .unwrap();
        session.capture(&store);

        assert_eq!(session.nodes.len(), 1);
        assert!(session.last_modified >= before);
    }

    #[test]
    fn restore_round_trips_the_snapshot() {
        let mut store = GraphStore::new();
        store
            .add_node(Node::source("acme/demo", Position::new(5.0, 6.0)))
            .unwrap();

        let mut session = Session::new("acme/demo");
        session.capture(&store);

        let restored = session.restore();
        assert_eq!(restored.nodes(), store.nodes());
        assert_eq!(restored.edges(), store.edges());
    }
}
