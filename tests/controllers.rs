mod common;

use common::*;
use std::sync::Arc;

use launchloom::controllers::{
    ControllerError, GeneratorController, Selection, SourceController, SynthesizerController,
    TranslatorController,
};
use launchloom::events::{CollectSink, EventBus, EventPayload};
use launchloom::graph::GraphStore;
use launchloom::node::{Node, StagePhase};
use launchloom::types::{DurationClass, Language, NodeId, NodeKind, Position, VoiceStyle};

/// Builds a store holding an analyzed source node, returning its id.
async fn analyzed_source(store: &mut GraphStore, analyzer: &Arc<ScriptedAnalyzer>) -> NodeId {
    let controller = SourceController::new(analyzer.clone());
    let source = Node::source("https://github.com/acme/demo", Position::new(100.0, 100.0));
    let id = source.id.clone();
    store.add_node(source).unwrap();
    let phase = controller.run(store, &id).await.unwrap();
    assert_eq!(phase, StagePhase::Ready);
    id
}

#[tokio::test]
async fn selecting_the_same_duration_twice_calls_the_provider_once() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let pitch = Arc::new(ScriptedPitch::new());
    let mut store = GraphStore::new();

    let source_id = analyzed_source(&mut store, &analyzer).await;
    let source_ctl = SourceController::new(analyzer.clone());
    let generator_id = source_ctl.spawn_generator(&mut store, &source_id).unwrap();

    let generator_ctl = GeneratorController::new(pitch.clone());
    generator_ctl
        .select(&mut store, &generator_id, DurationClass::Short)
        .unwrap();
    let phase = generator_ctl.run(&mut store, &generator_id).await.unwrap();
    assert_eq!(phase, StagePhase::Ready);
    assert_eq!(pitch.call_count(), 1);

    // Second selection of the same key is served entirely from cache.
    let selection = generator_ctl
        .select(&mut store, &generator_id, DurationClass::Short)
        .unwrap();
    assert_eq!(selection, Selection::CacheHit);
    let phase = generator_ctl.run(&mut store, &generator_id).await.unwrap();
    assert_eq!(phase, StagePhase::Ready);
    assert_eq!(pitch.call_count(), 1);

    let draft = store
        .generator(&generator_id)
        .unwrap()
        .active_draft()
        .unwrap()
        .clone();
    assert_eq!(draft.word_count, 80);
    assert_eq!(draft.estimated_seconds, 32);
}

#[tokio::test]
async fn regenerate_wires_the_sibling_from_the_upstream_source() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let pitch = Arc::new(ScriptedPitch::new());
    let mut store = GraphStore::new();

    let source_id = analyzed_source(&mut store, &analyzer).await;
    let source_ctl = SourceController::new(analyzer.clone());
    let generator_id = source_ctl.spawn_generator(&mut store, &source_id).unwrap();

    let generator_ctl = GeneratorController::new(pitch.clone());
    generator_ctl
        .select(&mut store, &generator_id, DurationClass::Short)
        .unwrap();
    generator_ctl.run(&mut store, &generator_id).await.unwrap();

    let before = store.generator(&generator_id).unwrap().clone();
    let sibling_id = generator_ctl.regenerate(&mut store, &generator_id).unwrap();

    // The originator's cache is untouched and the sibling starts empty.
    let after = store.generator(&generator_id).unwrap();
    assert_eq!(after, &before);
    let sibling = store.generator(&sibling_id).unwrap();
    assert!(sibling.drafts.is_empty());
    assert_eq!(sibling.phase, StagePhase::Empty);
    assert_eq!(sibling.upstream, source_id);

    // The new edge runs from the source, not from the originator.
    assert!(store.edge_between(&source_id, &sibling_id).is_some());
    assert!(store.edge_between(&generator_id, &sibling_id).is_none());
}

#[tokio::test]
async fn advance_wires_the_new_node_from_the_originator() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let pitch = Arc::new(ScriptedPitch::new());
    let mut store = GraphStore::new();

    let source_id = analyzed_source(&mut store, &analyzer).await;
    let source_ctl = SourceController::new(analyzer.clone());
    let generator_id = source_ctl.spawn_generator(&mut store, &source_id).unwrap();

    let generator_ctl = GeneratorController::new(pitch.clone());
    generator_ctl
        .select(&mut store, &generator_id, DurationClass::Short)
        .unwrap();
    generator_ctl.run(&mut store, &generator_id).await.unwrap();

    let translator_id = generator_ctl
        .spawn_translator(&mut store, &generator_id)
        .unwrap();
    let edge = store.edge_between(&generator_id, &translator_id).unwrap();
    assert_eq!(edge.source, generator_id);

    // The translator is seeded with the generator's active draft.
    let translator = store.translator(&translator_id).unwrap();
    assert_eq!(translator.source_text, words(80));
    assert_eq!(translator.upstream, generator_id);
}

#[tokio::test]
async fn two_advances_create_distinct_nodes_and_leave_the_generator_untouched() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let pitch = Arc::new(ScriptedPitch::new());
    let mut store = GraphStore::new();

    let source_id = analyzed_source(&mut store, &analyzer).await;
    let source_ctl = SourceController::new(analyzer.clone());
    let generator_id = source_ctl.spawn_generator(&mut store, &source_id).unwrap();

    let generator_ctl = GeneratorController::new(pitch.clone());
    generator_ctl
        .select(&mut store, &generator_id, DurationClass::Medium)
        .unwrap();
    generator_ctl.run(&mut store, &generator_id).await.unwrap();
    let before = store.generator(&generator_id).unwrap().clone();

    let first = generator_ctl
        .spawn_translator(&mut store, &generator_id)
        .unwrap();
    let second = generator_ctl
        .spawn_translator(&mut store, &generator_id)
        .unwrap();

    assert_ne!(first, second);
    assert!(store.edge_between(&generator_id, &first).is_some());
    assert!(store.edge_between(&generator_id, &second).is_some());
    assert_eq!(store.generator(&generator_id).unwrap(), &before);
}

#[tokio::test]
async fn switching_back_to_a_cached_language_is_free() {
    let translator = Arc::new(RecordingTranslator::new());
    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let pitch = Arc::new(ScriptedPitch::new());
    let mut store = GraphStore::new();

    let source_id = analyzed_source(&mut store, &analyzer).await;
    let source_ctl = SourceController::new(analyzer.clone());
    source_ctl
        .set_language(&mut store, &source_id, Language::Fr)
        .unwrap();
    let generator_id = source_ctl.spawn_generator(&mut store, &source_id).unwrap();

    let generator_ctl = GeneratorController::new(pitch.clone());
    generator_ctl
        .select(&mut store, &generator_id, DurationClass::Short)
        .unwrap();
    generator_ctl.run(&mut store, &generator_id).await.unwrap();
    let translator_id = generator_ctl
        .spawn_translator(&mut store, &generator_id)
        .unwrap();

    let translator_ctl = TranslatorController::new(translator.clone());
    // The spawned translator inherits the source's language selection.
    assert_eq!(store.translator(&translator_id).unwrap().active, Language::Fr);
    translator_ctl.run(&mut store, &translator_id).await.unwrap();
    let french = store
        .translator(&translator_id)
        .unwrap()
        .active_translation()
        .unwrap()
        .to_string();
    assert!(french.starts_with("[fr]"));
    assert_eq!(translator.calls_for(Language::Fr), 1);

    translator_ctl
        .select(&mut store, &translator_id, Language::En)
        .unwrap();
    translator_ctl.run(&mut store, &translator_id).await.unwrap();

    let nodes_before = store.nodes().len();
    let edges_before = store.edges().len();
    let total_calls_before = translator.total_calls();

    // Back to French: cache hit, nothing else moves.
    let selection = translator_ctl
        .select(&mut store, &translator_id, Language::Fr)
        .unwrap();
    assert_eq!(selection, Selection::CacheHit);
    let phase = translator_ctl.run(&mut store, &translator_id).await.unwrap();
    assert_eq!(phase, StagePhase::Ready);

    assert_eq!(store.nodes().len(), nodes_before);
    assert_eq!(store.edges().len(), edges_before);
    assert_eq!(translator.total_calls(), total_calls_before);
    assert_eq!(translator.calls_for(Language::Fr), 1);
    assert_eq!(
        store
            .translator(&translator_id)
            .unwrap()
            .active_translation()
            .unwrap(),
        french
    );
}

#[tokio::test]
async fn provider_failure_is_node_local_and_retryable() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let pitch = Arc::new(ScriptedPitch::failing_first(1));
    let mut store = GraphStore::new();

    let source_id = analyzed_source(&mut store, &analyzer).await;
    let source_ctl = SourceController::new(analyzer.clone());
    let generator_id = source_ctl.spawn_generator(&mut store, &source_id).unwrap();

    let generator_ctl = GeneratorController::new(pitch.clone());
    generator_ctl
        .select(&mut store, &generator_id, DurationClass::Long)
        .unwrap();

    let phase = generator_ctl.run(&mut store, &generator_id).await.unwrap();
    let message = phase.error_message().unwrap().to_string();
    assert!(message.contains("generation backend unavailable"));
    // Failure never populates the cache.
    assert!(store.generator(&generator_id).unwrap().drafts.is_empty());

    // Retry re-attempts the same operation and succeeds.
    let phase = generator_ctl.run(&mut store, &generator_id).await.unwrap();
    assert_eq!(phase, StagePhase::Ready);
    assert_eq!(pitch.call_count(), 2);
}

#[tokio::test]
async fn begin_rejects_reentry_while_computing() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let pitch = Arc::new(ScriptedPitch::new());
    let mut store = GraphStore::new();

    let source_id = analyzed_source(&mut store, &analyzer).await;
    let source_ctl = SourceController::new(analyzer.clone());
    let generator_id = source_ctl.spawn_generator(&mut store, &source_id).unwrap();

    let generator_ctl = GeneratorController::new(pitch.clone());
    let ticket = generator_ctl
        .begin(&mut store, &generator_id)
        .unwrap()
        .unwrap();

    // While the call is in flight both re-triggering and switching are
    // rejected.
    assert!(matches!(
        generator_ctl.begin(&mut store, &generator_id),
        Err(ControllerError::Busy { .. })
    ));
    assert!(matches!(
        generator_ctl.select(&mut store, &generator_id, DurationClass::Short),
        Err(ControllerError::Busy { .. })
    ));

    let completion = generator_ctl.execute(ticket).await;
    let phase = generator_ctl.complete(&mut store, completion).unwrap();
    assert_eq!(phase, StagePhase::Ready);
    assert_eq!(pitch.call_count(), 1);
}

#[tokio::test]
async fn invalid_reference_is_rejected_before_any_provider_call() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let mut store = GraphStore::new();
    let source_ctl = SourceController::new(analyzer.clone());

    let source = Node::source("not a repository", Position::default());
    let id = source.id.clone();
    store.add_node(source).unwrap();

    let err = source_ctl.begin(&mut store, &id).unwrap_err();
    assert!(matches!(err, ControllerError::InvalidInput { .. }));
    assert_eq!(analyzer.call_count(), 0);
}

#[tokio::test]
async fn full_pipeline_reaches_audio_and_emits_lifecycle_events() {
    let sink = CollectSink::new();
    let bus = EventBus::with_sink(sink.clone());
    bus.listen();

    let analyzer = Arc::new(ScriptedAnalyzer::new(demo_analysis()));
    let pitch = Arc::new(ScriptedPitch::new());
    let translator = Arc::new(RecordingTranslator::new());
    let speech = Arc::new(CountingSpeech::new());

    let source_ctl = SourceController::new(analyzer.clone()).with_emitter(bus.emitter());
    let generator_ctl = GeneratorController::new(pitch.clone()).with_emitter(bus.emitter());
    let translator_ctl = TranslatorController::new(translator.clone()).with_emitter(bus.emitter());
    let synthesizer_ctl = SynthesizerController::new(speech.clone()).with_emitter(bus.emitter());

    let mut store = GraphStore::new();
    let source = Node::source("https://github.com/acme/demo", Position::default());
    let source_id = source.id.clone();
    store.add_node(source).unwrap();

    source_ctl.run(&mut store, &source_id).await.unwrap();
    source_ctl
        .set_language(&mut store, &source_id, Language::De)
        .unwrap();
    let generator_id = source_ctl.spawn_generator(&mut store, &source_id).unwrap();
    generator_ctl.run(&mut store, &generator_id).await.unwrap();
    let translator_id = generator_ctl
        .spawn_translator(&mut store, &generator_id)
        .unwrap();
    translator_ctl.run(&mut store, &translator_id).await.unwrap();
    let synthesizer_id = translator_ctl
        .spawn_synthesizer(&mut store, &translator_id)
        .unwrap();

    synthesizer_ctl
        .select(&mut store, &synthesizer_id, VoiceStyle::PresenterMale)
        .unwrap();
    let phase = synthesizer_ctl
        .run(&mut store, &synthesizer_id)
        .await
        .unwrap();
    assert_eq!(phase, StagePhase::Ready);

    let synthesizer = store.synthesizer(&synthesizer_id).unwrap();
    assert_eq!(synthesizer.language, Language::De);
    let clip = synthesizer.active_clip().unwrap();
    assert_eq!(clip.media_type, "audio/mpeg");
    assert_eq!(speech.call_count(), 1);

    // Regenerating the synthesizer branches from its translator.
    let sibling_id = synthesizer_ctl
        .regenerate(&mut store, &synthesizer_id)
        .unwrap();
    assert!(store.edge_between(&translator_id, &sibling_id).is_some());

    bus.shutdown().await;
    let events = sink.snapshot();
    let spawned = events
        .iter()
        .filter(|e| matches!(e.payload, EventPayload::NodeSpawned { .. }))
        .count();
    assert_eq!(spawned, 4);
    assert!(events.iter().any(|e| matches!(
        &e.payload,
        EventPayload::StageCompleted { kind, .. } if *kind == NodeKind::Synthesizer
    )));
}
