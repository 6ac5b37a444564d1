//! # Launchloom: Graph-driven Multilingual Pitch Studio
//!
//! Launchloom turns a public code repository into narrated startup pitch
//! variants. Repository metadata is fetched and scored, a generative-language
//! model drafts pitch copy per duration class, a translation provider
//! localizes it, and a speech provider renders audio — all modeled as a
//! directed node graph the user can branch, regenerate, and rewire without
//! ever losing a computed result.
//!
//! ## Core Concepts
//!
//! - **Nodes**: one stage instance each — source, generator, translator,
//!   synthesizer — with a strongly typed payload per kind
//! - **Edges**: directed derivation links between stages
//! - **Variant cache**: per-node map from parameter key (duration class,
//!   language, voice style) to its computed result; at most one provider
//!   call per key for the lifetime of a node
//! - **Controllers**: one per kind, owning that kind's mutation rules and
//!   the two branching actions (regenerate a sibling, advance the pipeline)
//! - **Sessions**: at-rest snapshots of the graph, persisted across reloads
//!
//! ## Building a Graph
//!
//! ```rust
//! use launchloom::graph::GraphStore;
//! use launchloom::node::Node;
//! use launchloom::types::Position;
//!
//! let mut store = GraphStore::new();
//! let source = Node::source("https://github.com/acme/demo", Position::new(100.0, 100.0));
//! let source_id = source.id.clone();
//! store.add_node(source).unwrap();
//!
//! assert_eq!(store.nodes().len(), 1);
//! assert!(store.source(&source_id).unwrap().analysis.is_none());
//! ```
//!
//! ## Driving the Pipeline
//!
//! Controllers wrap one provider adapter each and apply results to the
//! store as atomic completions:
//!
//! ```no_run
//! use std::sync::Arc;
//! use launchloom::config::Config;
//! use launchloom::controllers::{GeneratorController, SourceController};
//! use launchloom::graph::GraphStore;
//! use launchloom::node::Node;
//! use launchloom::types::{DurationClass, Position};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let source_ctl = SourceController::new(Arc::new(config.github_client()));
//! let generator_ctl = GeneratorController::new(Arc::new(config.gemini_client()?));
//!
//! let mut store = GraphStore::new();
//! let source = Node::source("https://github.com/acme/demo", Position::default());
//! let source_id = source.id.clone();
//! store.add_node(source)?;
//!
//! source_ctl.run(&mut store, &source_id).await?;
//! let generator_id = source_ctl.spawn_generator(&mut store, &source_id)?;
//!
//! generator_ctl.select(&mut store, &generator_id, DurationClass::Short)?;
//! generator_ctl.run(&mut store, &generator_id).await?;
//!
//! if let Some(draft) = store.generator(&generator_id)?.active_draft() {
//!     println!("{} (~{}s)", draft.text, draft.estimated_seconds);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Provider failures never unwind: each controller absorbs them into its
//! node's [`StagePhase`](node::StagePhase) (with a retry re-entering the
//! compute step), so one failing node cannot crash siblings. `Err` returns
//! are reserved for logical misuse — unknown nodes, kind mismatches,
//! switching parameters while a call is in flight.
//!
//! ## Module Guide
//!
//! - [`types`] - Identifiers, node kinds, and parameter sets
//! - [`node`] - Node model and kind-specific payloads
//! - [`graph`] - Graph store and structural change semantics
//! - [`cache`] - The keyed variant cache shared by all controllers
//! - [`controllers`] - Per-kind controllers and branching actions
//! - [`flow`] - Linear single-pipeline mode
//! - [`adapters`] - Provider boundary traits and clients
//! - [`session`] - Session snapshots and persistence
//! - [`events`] - Stage lifecycle events and their fan-out bus
//! - [`telemetry`] - Tracing initialization and event rendering
//! - [`config`] - Environment-backed provider configuration

pub mod adapters;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod events;
pub mod flow;
pub mod graph;
pub mod node;
pub mod session;
pub mod telemetry;
pub mod types;
