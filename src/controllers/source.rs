//! Controller for source (repository analysis) nodes.

use std::sync::Arc;
use tracing::{debug, instrument};

use super::{ControllerError, Result, ADVANCE_DX};
use crate::adapters::{RepoAnalysis, RepoAnalyzer, RepoReference};
use crate::cache::KeyedCache;
use crate::events::{Emitter, Event};
use crate::graph::{Connection, GraphStore};
use crate::node::{GeneratorData, Node, NodeData, StagePhase};
use crate::types::{DurationClass, Language, NodeId, NodeKind};

/// Inputs captured at [`SourceController::begin`] for the async analysis call.
#[derive(Clone, Debug)]
pub struct AnalysisTicket {
    pub node: NodeId,
    pub repo_url: String,
}

/// Outcome of an analysis call, ready to be applied to the store.
#[derive(Debug)]
pub struct AnalysisCompletion {
    pub node: NodeId,
    outcome: std::result::Result<RepoAnalysis, String>,
}

/// Drives source nodes: analysis plus the first advance action.
///
/// A source node has no parameter key; its "variant" is the single analysis
/// result, computed at most once unless the node is re-triggered after a
/// failure.
pub struct SourceController {
    analyzer: Arc<dyn RepoAnalyzer>,
    events: Emitter,
}

impl SourceController {
    #[must_use]
    pub fn new(analyzer: Arc<dyn RepoAnalyzer>) -> Self {
        Self {
            analyzer,
            events: Emitter::disabled(),
        }
    }

    /// Routes this controller's lifecycle events to a bus.
    #[must_use]
    pub fn with_emitter(mut self, events: Emitter) -> Self {
        self.events = events;
        self
    }

    /// Selects the target language carried into spawned generators.
    pub fn set_language(
        &self,
        store: &mut GraphStore,
        id: &NodeId,
        language: Language,
    ) -> Result<()> {
        store.source_mut(id)?.language = language;
        Ok(())
    }

    /// Starts an analysis: validates the reference, marks the node
    /// `Computing`, and returns the ticket for [`execute`](Self::execute).
    /// Returns `None` when an analysis is already attached.
    pub fn begin(&self, store: &mut GraphStore, id: &NodeId) -> Result<Option<AnalysisTicket>> {
        let data = store.source_mut(id)?;
        if data.phase.is_computing() {
            return Err(ControllerError::Busy { id: id.clone() });
        }
        if data.analysis.is_some() {
            data.phase = StagePhase::Ready;
            return Ok(None);
        }
        // Input validation happens before any network activity.
        if let Err(err) = RepoReference::parse(&data.repo_url) {
            return Err(ControllerError::InvalidInput {
                id: id.clone(),
                message: err.to_string(),
            });
        }
        data.phase = StagePhase::Computing;
        let ticket = AnalysisTicket {
            node: id.clone(),
            repo_url: data.repo_url.clone(),
        };
        self.events.emit(Event::stage_started(
            id.clone(),
            NodeKind::Source,
            "analysis",
        ));
        Ok(Some(ticket))
    }

    /// Performs the provider call. Never touches the store; failures are
    /// absorbed into the completion.
    pub async fn execute(&self, ticket: AnalysisTicket) -> AnalysisCompletion {
        let outcome = self
            .analyzer
            .analyze(&ticket.repo_url)
            .await
            .map_err(|e| e.to_string());
        AnalysisCompletion {
            node: ticket.node,
            outcome,
        }
    }

    /// Applies a completion as one atomic state transition.
    pub fn complete(
        &self,
        store: &mut GraphStore,
        completion: AnalysisCompletion,
    ) -> Result<StagePhase> {
        let data = store.source_mut(&completion.node)?;
        match completion.outcome {
            Ok(analysis) => {
                data.analysis = Some(analysis);
                data.phase = StagePhase::Ready;
                self.events.emit(Event::stage_completed(
                    completion.node.clone(),
                    NodeKind::Source,
                    "analysis",
                ));
            }
            Err(message) => {
                data.phase = StagePhase::Failed {
                    message: message.clone(),
                };
                self.events.emit(Event::stage_failed(
                    completion.node.clone(),
                    NodeKind::Source,
                    "analysis",
                    message,
                ));
            }
        }
        Ok(store.source(&completion.node)?.phase.clone())
    }

    /// Begin → execute → complete, for sequential callers. The returned
    /// phase reports provider failures; `Err` is reserved for logical
    /// misuse.
    #[instrument(skip(self, store))]
    pub async fn run(&self, store: &mut GraphStore, id: &NodeId) -> Result<StagePhase> {
        match self.begin(store, id)? {
            None => Ok(store.source(id)?.phase.clone()),
            Some(ticket) => {
                let completion = self.execute(ticket).await;
                self.complete(store, completion)
            }
        }
    }

    /// Advance action: spawns a generator node seeded with the analysis,
    /// wired from this source.
    pub fn spawn_generator(&self, store: &mut GraphStore, id: &NodeId) -> Result<NodeId> {
        let node = store
            .node(id)
            .ok_or_else(|| crate::graph::GraphError::UnknownNode { id: id.clone() })?;
        let position = node.position;
        let data = store.source(id)?;
        let analysis = data
            .analysis
            .clone()
            .ok_or_else(|| ControllerError::NotReady { id: id.clone() })?;
        let language = data.language;

        let generator = Node::new(
            position.offset(ADVANCE_DX, 0.0),
            NodeData::Generator(GeneratorData {
                upstream: id.clone(),
                repo: analysis,
                language,
                active: DurationClass::Medium,
                drafts: KeyedCache::default(),
                phase: StagePhase::Empty,
            }),
        );
        let generator_id = generator.id.clone();
        store.add_node(generator)?;
        store.connect(Connection {
            source: id.clone(),
            target: generator_id.clone(),
        })?;
        debug!(source = %id, generator = %generator_id, "generator spawned");
        self.events.emit(Event::node_spawned(
            id.clone(),
            generator_id.clone(),
            NodeKind::Generator,
        ));
        Ok(generator_id)
    }
}
