//! Controller for generator (pitch drafting) nodes.

use std::sync::Arc;
use tracing::{debug, instrument, trace};

use super::{ControllerError, Result, Selection, ADVANCE_DX, SIBLING_DX, SIBLING_DY};
use crate::adapters::{PitchDraft, PitchGenerator, RepoAnalysis};
use crate::cache::KeyedCache;
use crate::events::{Emitter, Event};
use crate::graph::{Connection, GraphStore};
use crate::node::{GeneratorData, Node, NodeData, StagePhase, TranslatorData};
use crate::types::{DurationClass, Language, NodeId, NodeKind};

/// Inputs captured at [`GeneratorController::begin`] for the async draft call.
#[derive(Clone, Debug)]
pub struct DraftTicket {
    pub node: NodeId,
    pub key: DurationClass,
    repo: RepoAnalysis,
}

/// Outcome of a draft call, ready to be applied to the store.
#[derive(Debug)]
pub struct DraftCompletion {
    pub node: NodeId,
    pub key: DurationClass,
    outcome: std::result::Result<PitchDraft, String>,
}

/// Drives generator nodes: one pitch draft per duration class.
pub struct GeneratorController {
    model: Arc<dyn PitchGenerator>,
    events: Emitter,
}

impl GeneratorController {
    #[must_use]
    pub fn new(model: Arc<dyn PitchGenerator>) -> Self {
        Self {
            model,
            events: Emitter::disabled(),
        }
    }

    /// Routes this controller's lifecycle events to a bus.
    #[must_use]
    pub fn with_emitter(mut self, events: Emitter) -> Self {
        self.events = events;
        self
    }

    /// Switches the active duration class.
    ///
    /// A cached class is adopted immediately; an uncached one clears the
    /// active result and waits for an explicit [`run`](Self::run). Rejected
    /// while a draft is in flight.
    pub fn select(
        &self,
        store: &mut GraphStore,
        id: &NodeId,
        duration: DurationClass,
    ) -> Result<Selection> {
        let data = store.generator_mut(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }
        data.active = duration;
        if data.drafts.contains(&duration) {
            data.phase = StagePhase::Ready;
            Ok(Selection::CacheHit)
        } else {
            data.phase = StagePhase::Empty;
            Ok(Selection::NeedsCompute)
        }
    }

    /// Starts a draft for the active duration class; `None` when it is
    /// already cached.
    pub fn begin(&self, store: &mut GraphStore, id: &NodeId) -> Result<Option<DraftTicket>> {
        let data = store.generator_mut(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }
        let key = data.active;
        if data.drafts.contains(&key) {
            data.phase = StagePhase::Ready;
            return Ok(None);
        }
        data.phase = StagePhase::Computing;
        let ticket = DraftTicket {
            node: id.clone(),
            key,
            repo: data.repo.clone(),
        };
        self.events.emit(Event::stage_started(
            id.clone(),
            NodeKind::Generator,
            key.label(),
        ));
        Ok(Some(ticket))
    }

    /// Performs the provider call. Never touches the store; failures are
    /// absorbed into the completion.
    pub async fn execute(&self, ticket: DraftTicket) -> DraftCompletion {
        let outcome = self
            .model
            .draft(&ticket.repo, ticket.key)
            .await
            .map_err(|e| e.to_string());
        DraftCompletion {
            node: ticket.node,
            key: ticket.key,
            outcome,
        }
    }

    /// Applies a completion as one atomic state transition.
    ///
    /// A success for a key the user has since switched away from still
    /// fills the cache (it is adopted when the user switches back) but does
    /// not override the visible result; a stale failure is dropped.
    pub fn complete(
        &self,
        store: &mut GraphStore,
        completion: DraftCompletion,
    ) -> Result<StagePhase> {
        let data = store.generator_mut(&completion.node)?;
        match completion.outcome {
            Ok(draft) => {
                data.drafts.fill(completion.key, draft);
                if data.active == completion.key {
                    data.phase = StagePhase::Ready;
                    self.events.emit(Event::stage_completed(
                        completion.node.clone(),
                        NodeKind::Generator,
                        completion.key.label(),
                    ));
                } else {
                    trace!(node = %completion.node, key = %completion.key, "late draft cached silently");
                }
            }
            Err(message) => {
                if data.active == completion.key {
                    data.phase = StagePhase::Failed {
                        message: message.clone(),
                    };
                    self.events.emit(Event::stage_failed(
                        completion.node.clone(),
                        NodeKind::Generator,
                        completion.key.label(),
                        message,
                    ));
                } else {
                    trace!(node = %completion.node, key = %completion.key, "stale draft failure dropped");
                }
            }
        }
        Ok(store.generator(&completion.node)?.phase.clone())
    }

    /// Begin → execute → complete, for sequential callers.
    #[instrument(skip(self, store))]
    pub async fn run(&self, store: &mut GraphStore, id: &NodeId) -> Result<StagePhase> {
        match self.begin(store, id)? {
            None => Ok(store.generator(id)?.phase.clone()),
            Some(ticket) => {
                let completion = self.execute(ticket).await;
                self.complete(store, completion)
            }
        }
    }

    /// Regenerate action: spawns a sibling generator with an empty cache,
    /// wired from the *same source* this node was derived from. The
    /// originator's own cache is never touched, so prior results stay
    /// inspectable.
    pub fn regenerate(&self, store: &mut GraphStore, id: &NodeId) -> Result<NodeId> {
        let node = store
            .node(id)
            .ok_or_else(|| crate::graph::GraphError::UnknownNode { id: id.clone() })?;
        let position = node.position;
        let data = store.generator(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }

        let sibling = Node::new(
            position.offset(SIBLING_DX, SIBLING_DY),
            NodeData::Generator(GeneratorData {
                upstream: data.upstream.clone(),
                repo: data.repo.clone(),
                language: data.language,
                active: data.active,
                drafts: KeyedCache::default(),
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
        debug!(origin = %id, sibling = %sibling_id, "generator variant spawned");
        self.events.emit(Event::node_spawned(
            id.clone(),
            sibling_id.clone(),
            NodeKind::Generator,
        ));
        Ok(sibling_id)
    }

    /// Advance action: spawns a translator seeded with the active draft,
    /// wired from this generator.
    pub fn spawn_translator(&self, store: &mut GraphStore, id: &NodeId) -> Result<NodeId> {
        let node = store
            .node(id)
            .ok_or_else(|| crate::graph::GraphError::UnknownNode { id: id.clone() })?;
        let position = node.position;
        let data = store.generator(id)?;
        let draft = data
            .active_draft()
            .ok_or_else(|| ControllerError::NotReady { id: id.clone() })?;

        let translator = Node::new(
            position.offset(ADVANCE_DX, 0.0),
            NodeData::Translator(TranslatorData {
                upstream: id.clone(),
                source_text: draft.text.clone(),
                source_language: Language::En,
                active: data.language,
                translations: KeyedCache::default(),
                phase: StagePhase::Empty,
            }),
        );
        let translator_id = translator.id.clone();
        store.add_node(translator)?;
        store.connect(Connection {
            source: id.clone(),
            target: translator_id.clone(),
        })?;
        debug!(generator = %id, translator = %translator_id, "translator spawned");
        self.events.emit(Event::node_spawned(
            id.clone(),
            translator_id.clone(),
            NodeKind::Translator,
        ));
        Ok(translator_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AdapterError;
    use crate::types::Position;
    use async_trait::async_trait;

    struct FixedPitch;

    #[async_trait]
    impl PitchGenerator for FixedPitch {
        async fn draft(
            &self,
            _repo: &RepoAnalysis,
            _duration: DurationClass,
        ) -> std::result::Result<PitchDraft, AdapterError> {
            Ok(PitchDraft::from_text("alpha beta gamma"))
        }
    }

    struct FailingPitch;

    #[async_trait]
    impl PitchGenerator for FailingPitch {
        async fn draft(
            &self,
            _repo: &RepoAnalysis,
            _duration: DurationClass,
        ) -> std::result::Result<PitchDraft, AdapterError> {
            Err(AdapterError::Provider {
                provider: "test",
                message: "backend unavailable".to_string(),
            })
        }
    }

    fn demo_repo() -> RepoAnalysis {
        RepoAnalysis {
            name: "demo".to_string(),
            description: None,
            stars: 1,
            forks: 0,
            tech_stack: Vec::new(),
            readme_summary: "No README available".to_string(),
            recent_commit_count: 0,
            confidence_score: 0,
        }
    }

    fn generator_store() -> (GraphStore, NodeId) {
        let mut store = GraphStore::new();
        let node = Node::new(
            Position::default(),
            NodeData::Generator(GeneratorData {
                upstream: NodeId::from("src"),
                repo: demo_repo(),
                language: Language::En,
                active: DurationClass::Short,
                drafts: KeyedCache::default(),
                phase: StagePhase::Empty,
            }),
        );
        let id = node.id.clone();
        store.add_node(node).unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn late_completion_fills_cache_without_overriding_display() {
        let (mut store, id) = generator_store();
        let controller = GeneratorController::new(Arc::new(FixedPitch));

        let ticket = controller.begin(&mut store, &id).unwrap().unwrap();
        let completion = controller.execute(ticket).await;

        // The user navigated to another duration before the completion
        // was applied.
        {
            let data = store.generator_mut(&id).unwrap();
            data.active = DurationClass::Long;
            data.phase = StagePhase::Empty;
        }
        controller.complete(&mut store, completion).unwrap();

        let data = store.generator(&id).unwrap();
        assert!(data.drafts.contains(&DurationClass::Short));
        assert_eq!(data.active, DurationClass::Long);
        assert_eq!(data.phase, StagePhase::Empty);

        // Switching back adopts the silently cached record.
        let selection = controller
            .select(&mut store, &id, DurationClass::Short)
            .unwrap();
        assert_eq!(selection, Selection::CacheHit);
        assert_eq!(data_words(&store, &id), 3);
    }

    #[tokio::test]
    async fn stale_failure_is_dropped_silently() {
        let (mut store, id) = generator_store();
        let controller = GeneratorController::new(Arc::new(FailingPitch));

        let ticket = controller.begin(&mut store, &id).unwrap().unwrap();
        let completion = controller.execute(ticket).await;
        {
            let data = store.generator_mut(&id).unwrap();
            data.active = DurationClass::Medium;
            data.phase = StagePhase::Empty;
        }
        controller.complete(&mut store, completion).unwrap();

        let data = store.generator(&id).unwrap();
        assert!(data.drafts.is_empty());
        assert_eq!(data.phase, StagePhase::Empty);
    }

    fn data_words(store: &GraphStore, id: &NodeId) -> usize {
        store
            .generator(id)
            .unwrap()
            .active_draft()
            .map(|d| d.word_count)
            .unwrap_or(0)
    }
}
