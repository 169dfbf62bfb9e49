use std::time::Duration;

use tokio::time::Instant;

/// Quiet-period coalescing with suppression of repeated values.
///
/// Each [`push`](Self::push) replaces the pending value and restarts the
/// quiet period. Once the period elapses [`poll`](Self::poll) yields the
/// value, unless it equals the last value it yielded.
#[derive(Debug)]
pub(crate) struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
    last: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub(crate) fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last: None,
        }
    }

    /// Debouncer that treats `initial` as already emitted.
    pub(crate) fn with_initial(quiet: Duration, initial: T) -> Self {
        Self {
            last: Some(initial),
            ..Self::new(quiet)
        }
    }

    pub(crate) fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Take the pending value if its quiet period has elapsed.
    ///
    /// Returns `None` when nothing is due, or when the due value repeats the
    /// previously emitted one (the pending value is consumed either way).
    pub(crate) fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if deadline <= now => {}
            _ => return None,
        }
        let (value, _) = self.pending.take()?;
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());
        Some(value)
    }

    pub(crate) fn last_emitted(&self) -> Option<&T> {
        self.last.as_ref()
    }
}
