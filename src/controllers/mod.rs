//! Node controllers: one per node kind, sharing a single variant/cache
//! contract.
//!
//! A controller owns the rules for mutating its own kind's payload; no other
//! component writes a node's `data`. The shared contract, per parameter
//! change:
//!
//! 1. [`select`]: if the variant cache already holds the new key, adopt it as
//!    the active result immediately (no provider call, guaranteeing at most
//!    one call per `(node, key)` pair). Otherwise the active result is
//!    cleared and an explicit trigger is required.
//! 2. The trigger is split in three so a completion applies to the store as
//!    one atomic read-modify-write even when several provider calls are in
//!    flight on different nodes:
//!    - `begin`: synchronous; moves the node to `Computing` and returns a
//!      ticket of cloned inputs (or `None` when the active key is already
//!      cached). Rejected while another computation is pending on the node.
//!    - `execute`: async; performs the provider call with no store access.
//!      Failures are absorbed into the completion, never propagated.
//!    - `complete`: synchronous; fills the cache and updates the phase. A
//!      completion for a key the user has since switched away from still
//!      fills the cache but does not touch the visible result.
//!    A convenience `run` chains all three for sequential callers.
//! 3. Branching: `regenerate` spawns a sibling of the same kind wired from
//!    the originator's *upstream* (the originator's cache is never touched);
//!    the advance actions (`spawn_generator`, `spawn_translator`,
//!    `spawn_synthesizer`) spawn the next kind downstream wired from the
//!    originator itself, seeded with its active result.
//!
//! [`select`]: generator::GeneratorController::select

use miette::Diagnostic;
use thiserror::Error;

use crate::graph::GraphError;
use crate::types::NodeId;

pub mod generator;
pub mod source;
pub mod synthesizer;
pub mod translator;

pub use generator::GeneratorController;
pub use source::SourceController;
pub use synthesizer::SynthesizerController;
pub use translator::TranslatorController;

/// Canvas offset for a node spawned by an advance action.
pub(crate) const ADVANCE_DX: f64 = 450.0;
/// Canvas offset for a sibling spawned by regenerate.
pub(crate) const SIBLING_DX: f64 = 50.0;
pub(crate) const SIBLING_DY: f64 = 50.0;

/// Result of selecting a parameter key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The key was already computed; its record is now the active result.
    CacheHit,
    /// No record for this key yet; an explicit compute trigger is required.
    NeedsCompute,
}

/// Logical misuse of a controller.
///
/// Provider failures are *not* represented here: they are absorbed into the
/// owning node's [`StagePhase`](crate::node::StagePhase) and never unwind
/// past the node.
#[derive(Debug, Error, Diagnostic)]
pub enum ControllerError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    /// The node already has a provider call in flight.
    #[error("node {id} has a computation in flight")]
    #[diagnostic(
        code(launchloom::controllers::busy),
        help("Wait for the pending call to complete before switching or re-triggering.")
    )]
    Busy { id: NodeId },

    /// The node has no active result to branch or advance from.
    #[error("node {id} has no active result")]
    #[diagnostic(
        code(launchloom::controllers::not_ready),
        help("Compute a result for the active parameter key first.")
    )]
    NotReady { id: NodeId },

    /// Rejected before any provider call was made.
    #[error("invalid input for node {id}: {message}")]
    #[diagnostic(code(launchloom::controllers::invalid_input))]
    InvalidInput { id: NodeId, message: String },
}

pub type Result<T> = std::result::Result<T, ControllerError>;
