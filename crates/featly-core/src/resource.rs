// ── Async resource ──
//
// Value / loading / error tracking for one logical async operation.
// State lives in a `watch` channel so consumers can observe every
// transition; a generation counter stored in that state keeps
// overlapping runs from clobbering each other.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::stream::ResourceStream;

/// Point-in-time view of an [`AsyncResource`].
pub struct ResourceState<T> {
    /// Last successfully produced result.
    pub value: Option<Arc<T>>,
    /// True while the latest run is in flight.
    pub is_loading: bool,
    /// Failure of the latest run, cleared when a new run starts.
    pub last_error: Option<Arc<CoreError>>,
    /// Generation of the latest started run (0 = never run).
    pub generation: u64,
}

impl<T> ResourceState<T> {
    pub fn is_idle(&self) -> bool {
        !self.is_loading
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            value: None,
            is_loading: false,
            last_error: None,
            generation: 0,
        }
    }
}

impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            is_loading: self.is_loading,
            last_error: self.last_error.clone(),
            generation: self.generation,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ResourceState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceState")
            .field("value", &self.value)
            .field("is_loading", &self.is_loading)
            .field("last_error", &self.last_error)
            .field("generation", &self.generation)
            .finish()
    }
}

/// State container for one async operation.
///
/// [`run`](Self::run) is the only writer. Only the most recently started
/// run may store a value or error, or clear `is_loading`; results of
/// superseded runs are handed back to their caller and otherwise dropped.
pub struct AsyncResource<T> {
    name: &'static str,
    state: watch::Sender<ResourceState<T>>,
}

impl<T: Send + Sync + 'static> AsyncResource<T> {
    /// `name` only appears in log output.
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            name,
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    pub fn value(&self) -> Option<Arc<T>> {
        self.state.borrow().value.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn last_error(&self) -> Option<Arc<CoreError>> {
        self.state.borrow().last_error.clone()
    }

    pub fn subscribe(&self) -> ResourceStream<T> {
        ResourceStream::new(self.state.subscribe())
    }

    // ── Execution ────────────────────────────────────────────────────

    /// Run `operation` against this resource.
    ///
    /// Marks the resource loading and clears the previous error, awaits
    /// the operation, then records the value (success) or error
    /// (failure). `is_loading` is cleared by a drop guard, so it is reset
    /// even if the operation panics or this future is dropped mid-flight.
    ///
    /// Returns the produced value, or `None` on failure. Errors are never
    /// returned; read them from [`last_error`](Self::last_error).
    pub async fn run<F, Fut, E>(&self, operation: F) -> Option<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<CoreError>,
    {
        // Bump and publish in one write so concurrent starts cannot
        // interleave their generations.
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            s.is_loading = true;
            s.last_error = None;
            generation = s.generation;
        });
        let _release = LoadingGuard {
            resource: self,
            generation,
        };
        debug!(resource = self.name, generation, "run started");

        match operation().await {
            Ok(value) => {
                let value = Arc::new(value);
                self.commit(generation, |s| s.value = Some(Arc::clone(&value)));
                Some(value)
            }
            Err(err) => {
                let err: CoreError = err.into();
                warn!(resource = self.name, generation, error = %err, "run failed");
                let err = Arc::new(err);
                self.commit(generation, |s| s.last_error = Some(err));
                None
            }
        }
    }

    /// Apply `update` only if `generation` is still the latest run. The
    /// check and the write share the channel's write lock.
    fn commit(&self, generation: u64, update: impl FnOnce(&mut ResourceState<T>)) {
        let applied = self.state.send_if_modified(|s| {
            if s.generation == generation {
                update(s);
                true
            } else {
                false
            }
        });
        if !applied {
            debug!(
                resource = self.name,
                generation, "discarding result of superseded run"
            );
        }
    }
}

/// Clears `is_loading` when a run ends, however it ends.
struct LoadingGuard<'a, T: Send + Sync + 'static> {
    resource: &'a AsyncResource<T>,
    generation: u64,
}

impl<T: Send + Sync + 'static> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        let generation = self.generation;
        // The check and the write happen under the channel's write lock, so a
        // run that starts concurrently cannot have its loading flag cleared.
        self.resource.state.send_if_modified(|s| {
            if s.generation == generation && s.is_loading {
                s.is_loading = false;
                true
            } else {
                false
            }
        });
        debug!(resource = self.resource.name, generation, "run finished");
    }
}
