//! Controller for translator (localization) nodes.

use std::sync::Arc;
use tracing::{debug, instrument, trace};

use super::{ControllerError, Result, Selection, ADVANCE_DX, SIBLING_DX, SIBLING_DY};
use crate::adapters::Translator;
use crate::cache::KeyedCache;
use crate::events::{Emitter, Event};
use crate::graph::{Connection, GraphStore};
use crate::node::{Node, NodeData, StagePhase, SynthesizerData, TranslatorData};
use crate::types::{Language, NodeId, NodeKind, VoiceStyle};

/// Inputs captured at [`TranslatorController::begin`] for the async call.
#[derive(Clone, Debug)]
pub struct TranslationTicket {
    pub node: NodeId,
    pub key: Language,
    text: String,
}

/// Outcome of a translation call, ready to be applied to the store.
#[derive(Debug)]
pub struct TranslationCompletion {
    pub node: NodeId,
    pub key: Language,
    outcome: std::result::Result<String, String>,
}

/// Drives translator nodes: one localized text per target language.
pub struct TranslatorController {
    translator: Arc<dyn Translator>,
    events: Emitter,
}

impl TranslatorController {
    #[must_use]
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            events: Emitter::disabled(),
        }
    }

    /// Routes this controller's lifecycle events to a bus.
    #[must_use]
    pub fn with_emitter(mut self, events: Emitter) -> Self {
        self.events = events;
        self
    }

    /// Switches the active target language; cached languages are adopted
    /// with no network activity.
    pub fn select(
        &self,
        store: &mut GraphStore,
        id: &NodeId,
        language: Language,
    ) -> Result<Selection> {
        let data = store.translator_mut(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }
        data.active = language;
        if data.translations.contains(&language) {
            data.phase = StagePhase::Ready;
            Ok(Selection::CacheHit)
        } else {
            data.phase = StagePhase::Empty;
            Ok(Selection::NeedsCompute)
        }
    }

    /// Starts a translation for the active language; `None` when cached.
    pub fn begin(&self, store: &mut GraphStore, id: &NodeId) -> Result<Option<TranslationTicket>> {
        let data = store.translator_mut(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }
        let key = data.active;
        if data.translations.contains(&key) {
            data.phase = StagePhase::Ready;
            return Ok(None);
        }
        data.phase = StagePhase::Computing;
        let ticket = TranslationTicket {
            node: id.clone(),
            key,
            text: data.source_text.clone(),
        };
        self.events.emit(Event::stage_started(
            id.clone(),
            NodeKind::Translator,
            key.code(),
        ));
        Ok(Some(ticket))
    }

    /// Performs the provider call; failures are absorbed into the completion.
    pub async fn execute(&self, ticket: TranslationTicket) -> TranslationCompletion {
        let outcome = self
            .translator
            .translate(&ticket.text, ticket.key)
            .await
            .map_err(|e| e.to_string());
        TranslationCompletion {
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
        completion: TranslationCompletion,
    ) -> Result<StagePhase> {
        let data = store.translator_mut(&completion.node)?;
        match completion.outcome {
            Ok(text) => {
                data.translations.fill(completion.key, text);
                if data.active == completion.key {
                    data.phase = StagePhase::Ready;
                    self.events.emit(Event::stage_completed(
                        completion.node.clone(),
                        NodeKind::Translator,
                        completion.key.code(),
                    ));
                } else {
                    trace!(node = %completion.node, key = %completion.key, "late translation cached silently");
                }
            }
            Err(message) => {
                if data.active == completion.key {
                    data.phase = StagePhase::Failed {
                        message: message.clone(),
                    };
                    self.events.emit(Event::stage_failed(
                        completion.node.clone(),
                        NodeKind::Translator,
                        completion.key.code(),
                        message,
                    ));
                } else {
                    trace!(node = %completion.node, key = %completion.key, "stale translation failure dropped");
                }
            }
        }
        Ok(store.translator(&completion.node)?.phase.clone())
    }

    /// Begin → execute → complete, for sequential callers.
    #[instrument(skip(self, store))]
    pub async fn run(&self, store: &mut GraphStore, id: &NodeId) -> Result<StagePhase> {
        match self.begin(store, id)? {
            None => Ok(store.translator(id)?.phase.clone()),
            Some(ticket) => {
                let completion = self.execute(ticket).await;
                self.complete(store, completion)
            }
        }
    }

    /// Regenerate action: sibling translator with an empty cache, wired from
    /// the same generator the originator draws from.
    pub fn regenerate(&self, store: &mut GraphStore, id: &NodeId) -> Result<NodeId> {
        let node = store
            .node(id)
            .ok_or_else(|| crate::graph::GraphError::UnknownNode { id: id.clone() })?;
        let position = node.position;
        let data = store.translator(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }

        let sibling = Node::new(
            position.offset(SIBLING_DX, SIBLING_DY),
            NodeData::Translator(TranslatorData {
                upstream: data.upstream.clone(),
                source_text: data.source_text.clone(),
                source_language: data.source_language,
                active: data.active,
                translations: KeyedCache::default(),
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
        debug!(origin = %id, sibling = %sibling_id, "translator variant spawned");
        self.events.emit(Event::node_spawned(
            id.clone(),
            sibling_id.clone(),
            NodeKind::Translator,
        ));
        Ok(sibling_id)
    }

    /// Advance action: spawns a synthesizer seeded with the active
    /// translation, wired from this translator.
    pub fn spawn_synthesizer(&self, store: &mut GraphStore, id: &NodeId) -> Result<NodeId> {
        let node = store
            .node(id)
            .ok_or_else(|| crate::graph::GraphError::UnknownNode { id: id.clone() })?;
        let position = node.position;
        let data = store.translator(id)?;
        let text = data
            .active_translation()
            .ok_or_else(|| ControllerError::NotReady { id: id.clone() })?
            .to_string();

        let synthesizer = Node::new(
            position.offset(ADVANCE_DX, 0.0),
            NodeData::Synthesizer(SynthesizerData {
                upstream: id.clone(),
                text,
                language: data.active,
                active: VoiceStyle::ExecutiveFemale,
                renditions: KeyedCache::default(),
                phase: StagePhase::Empty,
            }),
        );
        let synthesizer_id = synthesizer.id.clone();
        store.add_node(synthesizer)?;
        store.connect(Connection {
            source: id.clone(),
            target: synthesizer_id.clone(),
        })?;
        debug!(translator = %id, synthesizer = %synthesizer_id, "synthesizer spawned");
        self.events.emit(Event::node_spawned(
            id.clone(),
            synthesizer_id.clone(),
            NodeKind::Synthesizer,
        ));
        Ok(synthesizer_id)
    }
}
