//! Node model for the pipeline graph.
//!
//! A [`Node`] is one stage instance: a source (repository analysis), a
//! generator (pitch drafting), a translator, or a synthesizer (speech).
//! The kind-specific payload is a tagged union ([`NodeData`]) so controllers
//! pattern-match on the tag instead of trusting an untyped payload shape.
//!
//! Each computing node also carries a [`StagePhase`], the node-local
//! lifecycle `empty → computing → ready → …` described by the controllers.
//! The phase applies to the *active* parameter key only; previously
//! computed variants stay available in the payload's cache regardless of
//! the current phase.

use serde::{Deserialize, Serialize};

use crate::adapters::{AudioClip, PitchDraft, RepoAnalysis};
use crate::cache::KeyedCache;
use crate::types::{DurationClass, Language, NodeId, NodeKind, Position, VoiceStyle};

/// Node-local lifecycle for the currently active parameter key.
///
/// There is no terminal state; a node remains interactive indefinitely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StagePhase {
    /// No result for the active key yet; an explicit trigger is required.
    #[default]
    Empty,
    /// A provider call for the active key is in flight. Parameter switching
    /// and re-triggering are rejected until it completes.
    Computing,
    /// The active key holds a cached result.
    Ready,
    /// The last attempt for the active key failed; retry re-enters the
    /// compute step. The cache is never populated on failure.
    Failed { message: String },
}

impl StagePhase {
    #[must_use]
    pub fn is_computing(&self) -> bool {
        matches!(self, StagePhase::Computing)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, StagePhase::Ready)
    }

    /// The human-readable failure message, if the phase is `Failed`.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            StagePhase::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Payload of a source node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceData {
    /// The repository reference as entered by the user.
    pub repo_url: String,
    /// Target language carried into spawned generators.
    pub language: Language,
    pub analysis: Option<RepoAnalysis>,
    pub phase: StagePhase,
}

/// Payload of a generator node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorData {
    /// The source node this generator draws its analysis from.
    pub upstream: NodeId,
    pub repo: RepoAnalysis,
    pub language: Language,
    pub active: DurationClass,
    pub drafts: KeyedCache<DurationClass, PitchDraft>,
    pub phase: StagePhase,
}

impl GeneratorData {
    /// The draft for the active duration class, if computed.
    #[must_use]
    pub fn active_draft(&self) -> Option<&PitchDraft> {
        self.drafts.get(&self.active)
    }
}

/// Payload of a translator node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranslatorData {
    /// The generator node whose draft this translator localizes.
    pub upstream: NodeId,
    pub source_text: String,
    pub source_language: Language,
    pub active: Language,
    pub translations: KeyedCache<Language, String>,
    pub phase: StagePhase,
}

impl TranslatorData {
    /// The translation for the active language, if computed.
    #[must_use]
    pub fn active_translation(&self) -> Option<&str> {
        self.translations.get(&self.active).map(String::as_str)
    }
}

/// Payload of a synthesizer node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynthesizerData {
    /// The translator node whose text this synthesizer voices.
    pub upstream: NodeId,
    pub text: String,
    pub language: Language,
    pub active: VoiceStyle,
    pub renditions: KeyedCache<VoiceStyle, AudioClip>,
    pub phase: StagePhase,
}

impl SynthesizerData {
    /// The audio rendition for the active voice style, if computed.
    #[must_use]
    pub fn active_clip(&self) -> Option<&AudioClip> {
        self.renditions.get(&self.active)
    }
}

/// Kind-specific node payload, discriminated by the node kind.
///
/// A payload is mutated only through its own node's controller; other
/// components read it through the store's typed accessors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeData {
    Source(SourceData),
    Generator(GeneratorData),
    Translator(TranslatorData),
    Synthesizer(SynthesizerData),
}

impl NodeData {
    /// The kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Source(_) => NodeKind::Source,
            NodeData::Generator(_) => NodeKind::Generator,
            NodeData::Translator(_) => NodeKind::Translator,
            NodeData::Synthesizer(_) => NodeKind::Synthesizer,
        }
    }

    /// The lifecycle phase for the payload's active key.
    #[must_use]
    pub fn phase(&self) -> &StagePhase {
        match self {
            NodeData::Source(d) => &d.phase,
            NodeData::Generator(d) => &d.phase,
            NodeData::Translator(d) => &d.phase,
            NodeData::Synthesizer(d) => &d.phase,
        }
    }

    /// The recorded upstream dependency; sources have none.
    #[must_use]
    pub fn upstream(&self) -> Option<&NodeId> {
        match self {
            NodeData::Source(_) => None,
            NodeData::Generator(d) => Some(&d.upstream),
            NodeData::Translator(d) => Some(&d.upstream),
            NodeData::Synthesizer(d) => Some(&d.upstream),
        }
    }
}

/// One stage instance in the pipeline graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Immutable, globally unique within a session, generated at creation.
    pub id: NodeId,
    pub kind: NodeKind,
    /// Mutated freely by drag interaction.
    pub position: Position,
    #[serde(default)]
    pub selected: bool,
    pub data: NodeData,
}

impl Node {
    /// Creates a node with a fresh id; the kind is derived from the payload
    /// so the two can never disagree.
    #[must_use]
    pub fn new(position: Position, data: NodeData) -> Self {
        Self {
            id: NodeId::generate(),
            kind: data.kind(),
            position,
            selected: false,
            data,
        }
    }

    /// Creates an empty source node for a repository reference.
    #[must_use]
    pub fn source(repo_url: impl Into<String>, position: Position) -> Self {
        Self::new(
            position,
            NodeData::Source(SourceData {
                repo_url: repo_url.into(),
                language: Language::En,
                analysis: None,
                phase: StagePhase::Empty,
            }),
        )
    }

    #[must_use]
    pub fn as_source(&self) -> Option<&SourceData> {
        match &self.data {
            NodeData::Source(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_generator(&self) -> Option<&GeneratorData> {
        match &self.data {
            NodeData::Generator(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_translator(&self) -> Option<&TranslatorData> {
        match &self.data {
            NodeData::Translator(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_synthesizer(&self) -> Option<&SynthesizerData> {
        match &self.data {
            NodeData::Synthesizer(d) => Some(d),
            _ => None,
        }
    }
}
