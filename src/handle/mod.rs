//! Handles to asynchronous computations and the ways to create them.

mod promise;
mod when_all;

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

pub use promise::Completer;
pub use when_all::when_all;

use promise::Shared;

use crate::{
    executors::spawn_boxed,
    outcome::{Faults, Outcome},
};

type BoxedOutcome<T, E> = Pin<Box<dyn Future<Output = Outcome<T, E>> + Send + 'static>>;

/// A computation that settles exactly once into a value, one or more faults,
/// or cancellation.
///
/// The handle is a [`Future`] resolving to the [`Outcome`], so it can be awaited
/// from other computations, or handed to [`wait_and_unwrap`](crate::wait_and_unwrap)
/// to block a thread on it. Either way it is observed once: awaiting it consumes it.
#[must_use = "a handle does nothing unless it is awaited or waited on"]
pub struct AsyncHandle<T, E> {
    source: Source<T, E>,
}

enum Source<T, E> {
    Promise(Arc<Shared<T, E>>),
    Derived(BoxedOutcome<T, E>),
}

/// Creates a pending handle together with the completer that settles it.
///
/// # Example
///
/// ```rust
/// use std::thread;
/// use sync_bridge::{promise, wait_and_unwrap};
///
/// let (completer, handle) = promise::<u32, String>();
/// thread::spawn(move || completer.complete(7));
/// assert_eq!(wait_and_unwrap(handle), Ok(7));
/// ```
pub fn promise<T, E>() -> (Completer<T, E>, AsyncHandle<T, E>) {
    let shared = Arc::new(Shared::new());
    (
        Completer::new(shared.clone()),
        AsyncHandle {
            source: Source::Promise(shared),
        },
    )
}

impl<T, E> AsyncHandle<T, E> {
    /// An already settled handle
    pub fn settled(outcome: Outcome<T, E>) -> Self {
        Self {
            source: Source::Promise(Arc::new(Shared::settled(outcome))),
        }
    }

    pub fn from_value(value: T) -> Self {
        Self::settled(Outcome::Value(value))
    }

    pub fn from_fault(error: E) -> Self {
        Self::settled(Outcome::fault(error))
    }

    pub fn from_faults(faults: Faults<E>) -> Self {
        Self::settled(Outcome::Faulted(faults))
    }

    pub fn cancelled() -> Self {
        Self::settled(Outcome::Cancelled)
    }

    pub(crate) fn derived<F>(future: F) -> Self
    where
        F: Future<Output = Outcome<T, E>> + Send + 'static,
    {
        Self {
            source: Source::Derived(Box::pin(future)),
        }
    }

    /// Returns true if a promise-backed handle has already settled.
    ///
    /// Aggregated handles only find out when they are polled, so this returns
    /// `false` for them until then.
    pub fn is_settled(&self) -> bool {
        match &self.source {
            Source::Promise(shared) => shared.is_settled(),
            Source::Derived(_) => false,
        }
    }
}

impl<T, E> Future for AsyncHandle<T, E> {
    type Output = Outcome<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.source {
            Source::Promise(shared) => shared.poll_outcome(cx),
            Source::Derived(future) => future.as_mut().poll(cx),
        }
    }
}

impl<T, E> fmt::Debug for AsyncHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncHandle")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Spawns `future` on the current scheduler and returns a handle to its outcome.
///
/// The current scheduler is the worker pool or [`LocalContext`](crate::LocalContext)
/// driving the calling code; on a thread with neither, the global
/// [`WorkerPool`](crate::WorkerPool) is used. `Ok` settles the handle with a
/// value and `Err` with a single fault.
///
/// # Example
///
/// ```rust
/// use sync_bridge::{spawn, wait_and_unwrap};
///
/// let handle = spawn(async { "forty-two".parse::<u32>() });
/// assert!(wait_and_unwrap(handle).unwrap_err().fault().is_some());
/// ```
pub fn spawn<F, T, E>(future: F) -> AsyncHandle<T, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    spawn_outcome(async move { Outcome::from(future.await) })
}

/// Spawns a computation that settles with an explicit [`Outcome`] on the
/// current scheduler.
pub fn spawn_outcome<F, T, E>(future: F) -> AsyncHandle<T, E>
where
    F: Future<Output = Outcome<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let (completer, handle) = promise();
    spawn_boxed(Box::pin(async move { completer.settle(future.await) }));
    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_on;

    #[test]
    fn settled_constructors() {
        assert_eq!(
            block_on(AsyncHandle::<u8, ()>::from_value(3)),
            Outcome::Value(3)
        );
        assert_eq!(
            block_on(AsyncHandle::<u8, &str>::from_fault("nope")),
            Outcome::fault("nope")
        );
        assert!(block_on(AsyncHandle::<u8, ()>::cancelled()).is_cancelled());
    }

    #[test]
    fn promise_settles_once() {
        let (completer, handle) = promise::<u8, ()>();
        assert!(!handle.is_settled());
        completer.complete(9);
        assert!(handle.is_settled());
        assert_eq!(block_on(handle), Outcome::Value(9));
    }

    #[test]
    fn dropped_completer_cancels() {
        let (completer, handle) = promise::<u8, ()>();
        drop(completer);
        assert!(block_on(handle).is_cancelled());
    }
}
