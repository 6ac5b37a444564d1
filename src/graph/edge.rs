//! Edge types for the pipeline graph.

use serde::{Deserialize, Serialize};

use crate::types::{EdgeId, NodeId, NodeKind};

/// Visual/semantic style tag of an edge, determined by the stage it feeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    /// Feeds a generator (analysis → pitch).
    #[default]
    Pitch,
    /// Feeds a translator (pitch → localized copy).
    Translation,
    /// Feeds a synthesizer (copy → audio).
    Voice,
}

impl EdgeStyle {
    /// The style used for an edge whose target is of the given kind.
    #[must_use]
    pub fn for_target(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Translator => EdgeStyle::Translation,
            NodeKind::Synthesizer => EdgeStyle::Voice,
            NodeKind::Source | NodeKind::Generator => EdgeStyle::Pitch,
        }
    }
}

/// A directed dependency link: `source → target` means the target was
/// derived from (and depends on) the source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub style: EdgeStyle,
    pub animated: bool,
    #[serde(default)]
    pub selected: bool,
}

impl Edge {
    /// Creates an animated edge with the canonical derived id.
    #[must_use]
    pub fn new(source: NodeId, target: NodeId, style: EdgeStyle) -> Self {
        Self {
            id: EdgeId::derived(&source, &target),
            source,
            target,
            style,
            animated: true,
            selected: false,
        }
    }
}

/// Minimal connection request; the store synthesizes the id and style.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
}
