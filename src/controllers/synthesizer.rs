//! Controller for synthesizer (speech) nodes.

use std::sync::Arc;
use tracing::{debug, instrument, trace};

use super::{ControllerError, Result, Selection, SIBLING_DX, SIBLING_DY};
use crate::adapters::{AudioClip, SpeechSynthesizer};
use crate::cache::KeyedCache;
use crate::events::{Emitter, Event};
use crate::graph::{Connection, GraphStore};
use crate::node::{Node, NodeData, StagePhase, SynthesizerData};
use crate::types::{Language, NodeId, NodeKind, VoiceStyle};

/// Inputs captured at [`SynthesizerController::begin`] for the async call.
#[derive(Clone, Debug)]
pub struct SynthesisTicket {
    pub node: NodeId,
    pub key: VoiceStyle,
    text: String,
    language: Language,
}

/// Outcome of a synthesis call, ready to be applied to the store.
#[derive(Debug)]
pub struct SynthesisCompletion {
    pub node: NodeId,
    pub key: VoiceStyle,
    outcome: std::result::Result<AudioClip, String>,
}

/// Drives synthesizer nodes: one audio rendition per voice style.
///
/// The last stage of the pipeline; it has no advance action.
pub struct SynthesizerController {
    speech: Arc<dyn SpeechSynthesizer>,
    events: Emitter,
}

impl SynthesizerController {
    #[must_use]
    pub fn new(speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            speech,
            events: Emitter::disabled(),
        }
    }

    /// Routes this controller's lifecycle events to a bus.
    #[must_use]
    pub fn with_emitter(mut self, events: Emitter) -> Self {
        self.events = events;
        self
    }

    /// Switches the active voice style; cached styles are adopted with no
    /// network activity.
    pub fn select(
        &self,
        store: &mut GraphStore,
        id: &NodeId,
        style: VoiceStyle,
    ) -> Result<Selection> {
        let data = store.synthesizer_mut(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }
        data.active = style;
        if data.renditions.contains(&style) {
            data.phase = StagePhase::Ready;
            Ok(Selection::CacheHit)
        } else {
            data.phase = StagePhase::Empty;
            Ok(Selection::NeedsCompute)
        }
    }

    /// Starts a synthesis for the active voice style; `None` when cached.
    pub fn begin(&self, store: &mut GraphStore, id: &NodeId) -> Result<Option<SynthesisTicket>> {
        let data = store.synthesizer_mut(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }
        let key = data.active;
        if data.renditions.contains(&key) {
            data.phase = StagePhase::Ready;
            return Ok(None);
        }
        data.phase = StagePhase::Computing;
        let ticket = SynthesisTicket {
            node: id.clone(),
            key,
            text: data.text.clone(),
            language: data.language,
        };
        self.events.emit(Event::stage_started(
            id.clone(),
            NodeKind::Synthesizer,
            key.as_str(),
        ));
        Ok(Some(ticket))
    }

    /// Performs the provider call; failures are absorbed into the completion.
    pub async fn execute(&self, ticket: SynthesisTicket) -> SynthesisCompletion {
        let outcome = self
            .speech
            .synthesize(&ticket.text, ticket.language, ticket.key)
            .await
            .map_err(|e| e.to_string());
        SynthesisCompletion {
            node: ticket.node,
            key: ticket.key,
            outcome,
        }
    }

    /// Applies a completion as one atomic state transition; see
    /// [`GeneratorController::complete`](super::GeneratorController::complete)
    /// for the stale-completion rules.
    pub fn complete(
        &self,
        store: &mut GraphStore,
        completion: SynthesisCompletion,
    ) -> Result<StagePhase> {
        let data = store.synthesizer_mut(&completion.node)?;
        match completion.outcome {
            Ok(clip) => {
                data.renditions.fill(completion.key, clip);
                if data.active == completion.key {
                    data.phase = StagePhase::Ready;
                    self.events.emit(Event::stage_completed(
                        completion.node.clone(),
                        NodeKind::Synthesizer,
                        completion.key.as_str(),
                    ));
                } else {
                    trace!(node = %completion.node, key = %completion.key, "late rendition cached silently");
                }
            }
            Err(message) => {
                if data.active == completion.key {
                    data.phase = StagePhase::Failed {
                        message: message.clone(),
                    };
                    self.events.emit(Event::stage_failed(
                        completion.node.clone(),
                        NodeKind::Synthesizer,
                        completion.key.as_str(),
                        message,
                    ));
                } else {
                    trace!(node = %completion.node, key = %completion.key, "stale rendition failure dropped");
                }
            }
        }
        Ok(store.synthesizer(&completion.node)?.phase.clone())
    }

    /// Begin → execute → complete, for sequential callers.
    #[instrument(skip(self, store))]
    pub async fn run(&self, store: &mut GraphStore, id: &NodeId) -> Result<StagePhase> {
        match self.begin(store, id)? {
            None => Ok(store.synthesizer(id)?.phase.clone()),
            Some(ticket) => {
                let completion = self.execute(ticket).await;
                self.complete(store, completion)
            }
        }
    }

    /// Regenerate action: sibling synthesizer with an empty cache, wired
    /// from the same translator the originator draws from.
    pub fn regenerate(&self, store: &mut GraphStore, id: &NodeId) -> Result<NodeId> {
        let node = store
            .node(id)
            .ok_or_else(|| crate::graph::GraphError::UnknownNode { id: id.clone() })?;
        let position = node.position;
        let data = store.synthesizer(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }

        let sibling = Node::new(
            position.offset(SIBLING_DX, SIBLING_DY),
            NodeData::Synthesizer(SynthesizerData {
                upstream: data.upstream.clone(),
                text: data.text.clone(),
                language: data.language,
                active: data.active,
                renditions: KeyedCache::default(),
                phase: StagePhase::Empty,
            }),
        );
        let sibling_id = sibling.id.clone();
        let upstream = data.upstream.clone();
        store.add_node(sibling)?;
        store.connect(Connection {
            source: upstream,
            target: sibling_id.clone(),
        })?;
        debug!(origin = %id, sibling = %sibling_id, "synthesizer variant spawned");
        self.events.emit(Event::node_spawned(
            id.clone(),
            sibling_id.clone(),
            NodeKind::Synthesizer,
        ));
        Ok(sibling_id)
    }
}
