//! Stage lifecycle events and their fan-out bus.
//!
//! Controllers report node lifecycle transitions (compute started,
//! completed, failed, node spawned) through a cheap [`Emitter`] handle. An
//! [`EventBus`] drains the shared channel on a background task and
//! broadcasts to pluggable [`EventSink`]s, so a presentation layer can
//! observe the pipeline without polling the store.
//!
//! ```rust
//! use launchloom::events::{CollectSink, Event, EventBus};
//! use launchloom::types::NodeKind;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sink = CollectSink::new();
//! let bus = EventBus::with_sink(sink.clone());
//! bus.listen();
//!
//! let emitter = bus.emitter();
//! emitter.emit(Event::stage_started("n1".into(), NodeKind::Generator, "60s"));
//!
//! bus.shutdown().await;
//! assert_eq!(sink.snapshot().len(), 1);
//! # }
//! ```

mod bus;
mod event;

pub use bus::{CollectSink, Emitter, EventBus, EventSink, StdErrSink};
pub use event::{Event, EventPayload};
