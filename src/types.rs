//! Core types for the launchloom pipeline graph.
//!
//! This module defines the fundamental vocabulary used throughout the crate:
//! node/edge identifiers, the four pipeline node kinds, and the closed
//! parameter sets (duration class, language, voice style) that key each
//! node's variant cache.
//!
//! # Examples
//!
//! ```rust
//! use launchloom::types::{DurationClass, Language, NodeKind};
//!
//! let kind = NodeKind::Generator;
//! assert_eq!(kind.encode(), "generator");
//! assert_eq!(NodeKind::decode("generator"), Some(NodeKind::Generator));
//!
//! assert_eq!(DurationClass::Short.seconds(), 30);
//! assert_eq!(Language::Fr.display_name(), "French");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a node within a session.
///
/// Ids are generated once at node creation and never change afterwards.
/// They are plain strings on the wire so persisted sessions stay
/// human-inspectable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generates a fresh, globally unique node id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier of an edge within a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Derives the canonical id for an edge between two nodes.
    ///
    /// The store rejects duplicate `{source, target}` pairs, so the derived
    /// form is unique within a graph.
    #[must_use]
    pub fn derived(source: &NodeId, target: &NodeId) -> Self {
        Self(format!("e-{source}-{target}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// 2D canvas coordinate of a node.
///
/// Mutated freely by drag interaction; carries no semantics beyond layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by the given offsets.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The kind of a pipeline node.
///
/// Each kind owns a distinct payload (see [`crate::node::NodeData`]) and a
/// distinct parameter set for its variant cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Holds the repository reference and its analysis result.
    Source,
    /// Drafts pitch copy from an analysis, one variant per duration class.
    Generator,
    /// Localizes pitch copy, one variant per target language.
    Translator,
    /// Renders speech audio, one variant per voice style.
    Synthesizer,
}

impl NodeKind {
    /// Encodes this kind into its persisted string form.
    #[must_use]
    pub fn encode(&self) -> &'static str {
        match self {
            NodeKind::Source => "source",
            NodeKind::Generator => "generator",
            NodeKind::Translator => "translator",
            NodeKind::Synthesizer => "synthesizer",
        }
    }

    /// Decodes a persisted string form back into a kind.
    #[must_use]
    pub fn decode(s: &str) -> Option<Self> {
        match s {
            "source" => Some(NodeKind::Source),
            "generator" => Some(NodeKind::Generator),
            "translator" => Some(NodeKind::Translator),
            "synthesizer" => Some(NodeKind::Synthesizer),
            _ => None,
        }
    }

    /// The kind spawned by this kind's advance-pipeline action, if any.
    #[must_use]
    pub fn downstream(&self) -> Option<NodeKind> {
        match self {
            NodeKind::Source => Some(NodeKind::Generator),
            NodeKind::Generator => Some(NodeKind::Translator),
            NodeKind::Translator => Some(NodeKind::Synthesizer),
            NodeKind::Synthesizer => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}

/// Pitch duration class, surfaced to users as 30s/60s/90s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationClass {
    Short,
    Medium,
    Long,
}

impl DurationClass {
    pub const ALL: [DurationClass; 3] = [
        DurationClass::Short,
        DurationClass::Medium,
        DurationClass::Long,
    ];

    /// Target spoken length in seconds.
    #[must_use]
    pub fn seconds(&self) -> u32 {
        match self {
            DurationClass::Short => 30,
            DurationClass::Medium => 60,
            DurationClass::Long => 90,
        }
    }

    /// The user-facing label ("30s", "60s", "90s").
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DurationClass::Short => "30s",
            DurationClass::Medium => "60s",
            DurationClass::Long => "90s",
        }
    }

    /// Target word range for prompt construction, matched to natural spoken
    /// delivery at ~150 words/minute.
    #[must_use]
    pub fn word_range(&self) -> (u32, u32) {
        match self {
            DurationClass::Short => (75, 90),
            DurationClass::Medium => (150, 180),
            DurationClass::Long => (225, 270),
        }
    }
}

impl fmt::Display for DurationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Supported pitch language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    Ja,
    Hi,
    De,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::Ja,
        Language::Hi,
        Language::De,
    ];

    /// ISO 639-1 code, as sent to the translation and speech providers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Ja => "ja",
            Language::Hi => "hi",
            Language::De => "de",
        }
    }

    /// Parses an ISO 639-1 code; `None` for anything outside the supported set.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            "fr" => Some(Language::Fr),
            "ja" => Some(Language::Ja),
            "hi" => Some(Language::Hi),
            "de" => Some(Language::De),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::Ja => "Japanese",
            Language::Hi => "Hindi",
            Language::De => "German",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Voice style used for speech synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceStyle {
    ExecutiveFemale,
    ExecutiveMale,
    PresenterFemale,
    PresenterMale,
}

impl VoiceStyle {
    pub const ALL: [VoiceStyle; 4] = [
        VoiceStyle::ExecutiveFemale,
        VoiceStyle::ExecutiveMale,
        VoiceStyle::PresenterFemale,
        VoiceStyle::PresenterMale,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceStyle::ExecutiveFemale => "executive_female",
            VoiceStyle::ExecutiveMale => "executive_male",
            VoiceStyle::PresenterFemale => "presenter_female",
            VoiceStyle::PresenterMale => "presenter_male",
        }
    }
}

impl fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated spoken duration for a word count, in whole seconds.
///
/// Uses a fixed rate of 0.4 seconds/word (~150 words/minute). This is a
/// display estimate, not measured audio length; every surface that shows a
/// duration without a measured counterpart derives it through this function
/// so the numbers agree.
///
/// ```rust
/// assert_eq!(launchloom::types::estimated_spoken_seconds(80), 32);
/// ```
#[must_use]
pub fn estimated_spoken_seconds(word_count: usize) -> u64 {
    (word_count as f64 * 0.4).round() as u64
}

/// Counts whitespace-separated words, the same way every provider-facing
/// estimate in the crate does.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
