use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;

use super::events::QueryOutcome;

/// Subscription to a coordinator's outcomes.
///
/// Sees every outcome published after it was created. A subscriber that
/// falls more than the configured buffer behind skips the oldest outcomes
/// and keeps going. The stream ends once the coordinator has shut down;
/// dropping it unsubscribes.
pub struct ResultStream {
    inner: BroadcastStream<QueryOutcome>,
}

impl std::fmt::Debug for ResultStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStream").finish_non_exhaustive()
    }
}

impl ResultStream {
    pub(crate) fn new(receiver: broadcast::Receiver<QueryOutcome>) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
        }
    }

    /// A stream that is already finished, handed out after shutdown.
    pub(crate) fn closed() -> Self {
        let (sender, receiver) = broadcast::channel(1);
        drop(sender);
        Self::new(receiver)
    }
}

impl Stream for ResultStream {
    type Item = QueryOutcome;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(outcome))) => {
                    return Poll::Ready(Some(outcome));
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(
                    skipped,
                )))) => {
                    warn!(skipped, "result subscriber lagged; skipping");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
