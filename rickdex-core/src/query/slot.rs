use tokio::task::JoinHandle;
use tracing::debug;

use super::events::FetchOrigin;

/// Switch-to-latest bookkeeping for one request channel.
///
/// Every new request bumps the generation and aborts whatever the channel
/// had in flight. Completions carry the generation they were started with;
/// only the current one may be delivered.
#[derive(Debug)]
pub(crate) struct LatestSlot {
    origin: FetchOrigin,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl LatestSlot {
    pub(crate) fn new(origin: FetchOrigin) -> Self {
        Self {
            origin,
            generation: 0,
            in_flight: None,
        }
    }

    /// Abandon the in-flight request (if any) and return the generation for
    /// the next one.
    pub(crate) fn begin(&mut self) -> u64 {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            debug!(
                origin = %self.origin,
                generation = self.generation,
                "superseded in-flight request"
            );
        }
        self.generation += 1;
        self.generation
    }

    pub(crate) fn attach(&mut self, handle: JoinHandle<()>) {
        self.in_flight = Some(handle);
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Mark the current request as finished. Stale generations are ignored.
    pub(crate) fn settle(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.in_flight = None;
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub(crate) fn abort(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
