//! Event fan-out from controllers to pluggable sinks.

use std::sync::{Arc, Mutex};
use tokio::{sync::oneshot, task};
use tracing::trace;

use super::event::Event;
use crate::telemetry::{render_event, FormatterMode};

/// Consumes events broadcast by the [`EventBus`].
pub trait EventSink: Send {
    fn handle(&mut self, event: &Event);
}

/// Prints events to stderr through the telemetry formatter.
#[derive(Default)]
pub struct StdErrSink {
    mode: FormatterMode,
}

impl StdErrSink {
    #[must_use]
    pub fn with_mode(mode: FormatterMode) -> Self {
        Self { mode }
    }
}

impl EventSink for StdErrSink {
    fn handle(&mut self, event: &Event) {
        eprintln!("{}", render_event(event, self.mode));
    }
}

/// Accumulates events in memory; handy for assertions in tests.
#[derive(Clone, Default)]
pub struct CollectSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl CollectSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything collected so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().expect("collect sink poisoned").clone()
    }
}

impl EventSink for CollectSink {
    fn handle(&mut self, event: &Event) {
        self.events
            .lock()
            .expect("collect sink poisoned")
            .push(event.clone());
    }
}

/// Cheap cloneable handle controllers use to emit events.
///
/// Emission is best-effort: once the bus is gone, events are dropped with a
/// trace log rather than failing the mutation that produced them.
#[derive(Clone, Debug, Default)]
pub struct Emitter {
    sender: Option<flume::Sender<Event>>,
}

impl Emitter {
    /// An emitter that discards everything; the default for controllers
    /// constructed without a bus.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: Event) {
        if let Some(sender) = &self.sender {
            if sender.send(event).is_err() {
                trace!("event bus disconnected; event dropped");
            }
        }
    }
}

/// Receives events from [`Emitter`] handles and broadcasts them to sinks.
pub struct EventBus {
    sinks: Arc<Mutex<Vec<Box<dyn EventSink>>>>,
    channel: (flume::Sender<Event>, flume::Receiver<Event>),
    listener: Mutex<Option<ListenerState>>,
}

struct ListenerState {
    shutdown_tx: oneshot::Sender<()>,
    handle: task::JoinHandle<()>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_sink(StdErrSink::default())
    }
}

impl EventBus {
    /// Creates a bus with a single sink.
    pub fn with_sink<T: EventSink + 'static>(sink: T) -> Self {
        Self {
            sinks: Arc::new(Mutex::new(vec![Box::new(sink)])),
            channel: flume::unbounded(),
            listener: Mutex::new(None),
        }
    }

    /// Dynamically adds a sink.
    pub fn add_sink<T: EventSink + 'static>(&self, sink: T) {
        self.sinks
            .lock()
            .expect("sink registry poisoned")
            .push(Box::new(sink));
    }

    /// An emitter handle for producers.
    #[must_use]
    pub fn emitter(&self) -> Emitter {
        Emitter {
            sender: Some(self.channel.0.clone()),
        }
    }

    /// Spawns the background task that drains the channel into the sinks.
    /// Idempotent: calling multiple times has no effect.
    pub fn listen(&self) {
        let mut guard = self.listener.lock().expect("listener poisoned");
        if guard.is_some() {
            return;
        }

        let receiver = self.channel.1.clone();
        let sinks = self.sinks.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let handle = task::spawn(async move {
            let deliver = |event: Event| {
                let mut sinks = sinks.lock().expect("sink registry poisoned");
                for sink in sinks.iter_mut() {
                    sink.handle(&event);
                }
            };
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        // Drain anything already emitted so shutdown is
                        // deterministic.
                        while let Ok(event) = receiver.try_recv() {
                            deliver(event);
                        }
                        break;
                    }
                    recv = receiver.recv_async() => match recv {
                        Err(_) => break,
                        Ok(event) => deliver(event),
                    }
                }
            }
        });

        *guard = Some(ListenerState {
            shutdown_tx,
            handle,
        });
    }

    /// Stops the background listener, waiting for it to drain.
    pub async fn shutdown(&self) {
        let state = {
            let mut guard = self.listener.lock().expect("listener poisoned");
            guard.take()
        };
        if let Some(state) = state {
            let _ = state.shutdown_tx.send(());
            let _ = state.handle.await;
        }
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.listener.lock() {
            if let Some(state) = guard.take() {
                let _ = state.shutdown_tx.send(());
                state.handle.abort();
            }
        }
    }
}
