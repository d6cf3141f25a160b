// ── Resource subscriptions ──
//
// Each run moves a resource through loading, then value or error, then
// idle. These types let callers follow those transitions.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::resource::ResourceState;

/// Follows the loading/value/error transitions of one
/// [`AsyncResource`](crate::AsyncResource).
///
/// Holds the state seen when the subscription was taken. `changed()`
/// waits for the next transition; `into_stream()` yields them all.
pub struct ResourceStream<T: Send + Sync + 'static> {
    current: ResourceState<T>,
    receiver: watch::Receiver<ResourceState<T>>,
}

impl<T: Send + Sync + 'static> ResourceStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<ResourceState<T>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// State as of subscribing, or as of the last `changed()`.
    pub fn current(&self) -> &ResourceState<T> {
        &self.current
    }

    /// State right now, without consuming the pending transition.
    pub fn latest(&self) -> ResourceState<T> {
        self.receiver.borrow().clone()
    }

    /// Next transition. `None` once the owning controller is gone.
    pub async fn changed(&mut self) -> Option<ResourceState<T>> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    /// Every transition from here on, as a `Stream`.
    pub fn into_stream(self) -> ResourceWatchStream<T> {
        ResourceWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// Stream of resource states: the one in effect when polling starts,
/// then each later transition. Intermediate states may be coalesced
/// if the consumer falls behind.
pub struct ResourceWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<ResourceState<T>>,
}

impl<T: Send + Sync + 'static> Stream for ResourceWatchStream<T> {
    type Item = ResourceState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
