//! Stage lifecycle events emitted by node controllers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{NodeId, NodeKind};

/// What happened, without the timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventPayload {
    /// A provider call for a node's active key went in flight.
    StageStarted {
        node: NodeId,
        kind: NodeKind,
        key: String,
    },
    /// The call completed and the result became the node's active variant.
    StageCompleted {
        node: NodeId,
        kind: NodeKind,
        key: String,
    },
    /// The call failed; the node entered its error state.
    StageFailed {
        node: NodeId,
        kind: NodeKind,
        key: String,
        message: String,
    },
    /// A branching action created a new node.
    NodeSpawned {
        origin: NodeId,
        node: NodeId,
        kind: NodeKind,
    },
}

/// A timestamped stage lifecycle event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub when: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl Event {
    #[must_use]
    pub fn stage_started(node: NodeId, kind: NodeKind, key: impl Into<String>) -> Self {
        Self {
            when: Utc::now(),
            payload: EventPayload::StageStarted {
                node,
                kind,
                key: key.into(),
            },
        }
    }

    #[must_use]
    pub fn stage_completed(node: NodeId, kind: NodeKind, key: impl Into<String>) -> Self {
        Self {
            when: Utc::now(),
            payload: EventPayload::StageCompleted {
                node,
                kind,
                key: key.into(),
            },
        }
    }

    #[must_use]
    pub fn stage_failed(
        node: NodeId,
        kind: NodeKind,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            when: Utc::now(),
            payload: EventPayload::StageFailed {
                node,
                kind,
                key: key.into(),
                message: message.into(),
            },
        }
    }

    #[must_use]
    pub fn node_spawned(origin: NodeId, node: NodeId, kind: NodeKind) -> Self {
        Self {
            when: Utc::now(),
            payload: EventPayload::NodeSpawned { origin, node, kind },
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            EventPayload::StageStarted { node, kind, key } => {
                write!(f, "{kind} {node}: computing [{key}]")
            }
            EventPayload::StageCompleted { node, kind, key } => {
                write!(f, "{kind} {node}: ready [{key}]")
            }
            EventPayload::StageFailed {
                node,
                kind,
                key,
                message,
            } => write!(f, "{kind} {node}: failed [{key}]: {message}"),
            EventPayload::NodeSpawned { origin, node, kind } => {
                write!(f, "{kind} {node}: spawned from {origin}")
            }
        }
    }
}
