use crate::{
    error::WaitError,
    executors::{block_on, WorkerPool},
    handle::AsyncHandle,
};

/// Something a thread can block on until it yields a value or an error.
///
/// Implemented by [`AsyncHandle`], which is waited on directly, and by
/// [`Offload`], which first moves its computation onto a worker pool.
pub trait Waitable {
    /// Value of a successful computation
    type Value;
    /// Error of a faulted computation
    type Error;

    /// Blocks the calling thread until the computation settles, then unwraps it.
    fn wait_and_unwrap(self) -> Result<Self::Value, WaitError<Self::Error>>;
}

impl<T, E> Waitable for AsyncHandle<T, E> {
    type Value = T;
    type Error = E;

    fn wait_and_unwrap(self) -> Result<T, WaitError<E>> {
        block_on(self).into_result()
    }
}

/// A computation factory bound for the global worker pool, see [`offload`]
#[must_use = "an offload does nothing unless it is waited on"]
pub struct Offload<F> {
    factory: F,
}

/// Wraps `factory` so that waiting on it runs it on the global [`WorkerPool`]
/// instead of on the waiting thread.
///
/// The factory is not invoked until the offload is waited on, and then exactly
/// once, by a worker thread.
pub fn offload<F, T, E>(factory: F) -> Offload<F>
where
    F: FnOnce() -> AsyncHandle<T, E> + Send + 'static,
{
    Offload { factory }
}

impl<F, T, E> Waitable for Offload<F>
where
    F: FnOnce() -> AsyncHandle<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Value = T;
    type Error = E;

    fn wait_and_unwrap(self) -> Result<T, WaitError<E>> {
        WorkerPool::global().wait_and_unwrap(self.factory)
    }
}

/// Blocks the calling thread until `waitable` settles and unwraps its outcome.
///
/// * a value is returned as `Ok`;
/// * a cancelled computation returns [`WaitError::Cancelled`];
/// * a faulted one returns [`WaitError::Faulted`] with its first error, in
///   the order the computation reported them; the others are dropped.
///
/// There is no timeout: a computation that never settles blocks forever.
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
/// use sync_bridge::{offload, spawn, wait_and_unwrap, AsyncHandle, WaitError};
///
/// // an existing handle, waited on directly
/// let handle = AsyncHandle::<u8, &str>::from_fault("broken");
/// assert_eq!(wait_and_unwrap(handle), Err(WaitError::Faulted("broken")));
///
/// // a factory, run on the worker pool first
/// let value = wait_and_unwrap(offload(|| spawn(async { Ok::<_, Infallible>(1) })));
/// assert_eq!(value, Ok(1));
/// ```
pub fn wait_and_unwrap<W: Waitable>(waitable: W) -> Result<W::Value, WaitError<W::Error>> {
    waitable.wait_and_unwrap()
}
