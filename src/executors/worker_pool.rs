use std::{
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock,
    },
};

use parking_lot::Mutex;
use threadpool::{Builder, ThreadPool};

use super::task::{Schedule, Task};
use crate::{
    config::PoolConfig,
    error::{ConfigError, WaitError},
    handle::{promise, AsyncHandle},
    outcome::Outcome,
    waiter,
};

/// A pool of worker threads that drives spawned computations.
///
/// A computation occupies a thread only while it is being polled. One that is
/// suspended (on a timer, another handle, ...) goes back to the pool's queue
/// when woken, so any number of suspended computations can share few threads.
///
/// Cloning a `WorkerPool` yields another handle to the same threads.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<Inner>,
}

struct Inner {
    pool: Mutex<ThreadPool>,
    active: AtomicUsize,
    threads: usize,
}

impl Schedule for Inner {
    fn schedule(&self, task: Arc<Task>) {
        tracing::trace!("scheduling task on worker pool");
        self.pool.lock().execute(move || task.run());
    }

    fn task_started(&self) {
        self.active.fetch_add(1, Ordering::AcqRel);
    }

    fn task_finished(&self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

impl WorkerPool {
    /// Starts a pool from `config`
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Starts a pool of `num_of_threads` threads with otherwise default settings
    pub fn with_threads(num_of_threads: usize) -> Result<Self, ConfigError> {
        Self::new(PoolConfig::default().with_worker_threads(num_of_threads))
    }

    fn build(config: PoolConfig) -> Self {
        let mut builder = Builder::new()
            .num_threads(config.worker_threads)
            .thread_name(config.thread_name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.thread_stack_size(stack_size);
        }
        tracing::debug!(
            threads = config.worker_threads,
            name = %config.thread_name,
            "starting worker pool"
        );
        Self {
            inner: Arc::new(Inner {
                pool: Mutex::new(builder.build()),
                active: AtomicUsize::new(0),
                threads: config.worker_threads,
            }),
        }
    }

    /// The process-wide pool used by [`offload`](crate::offload) and by
    /// [`spawn`](crate::spawn) outside of any scheduler.
    ///
    /// Created on first use from [`PoolConfig::from_env`].
    pub fn global() -> &'static WorkerPool {
        static GLOBAL: OnceLock<WorkerPool> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::build(PoolConfig::from_env()))
    }

    pub(crate) fn scheduler(&self) -> Arc<dyn Schedule> {
        self.inner.clone()
    }
}

impl WorkerPool {
    /// Spawns `future` on this pool and returns a handle to its outcome.
    ///
    /// `Ok` settles the handle with a value and `Err` with a single fault.
    pub fn spawn<F, T, E>(&self, future: F) -> AsyncHandle<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.spawn_outcome(async move { Outcome::from(future.await) })
    }

    /// Spawns a computation that settles with an explicit [`Outcome`], which
    /// lets it report several faults or cancel itself
    pub fn spawn_outcome<F, T, E>(&self, future: F) -> AsyncHandle<T, E>
    where
        F: Future<Output = Outcome<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (completer, handle) = promise();
        Task::spawn(
            Box::pin(async move { completer.settle(future.await) }),
            self.scheduler(),
        );
        handle
    }

    /// Hands `factory` to a worker, which invokes it and follows the handle it returns.
    ///
    /// The factory runs with this pool as the current scheduler, so computations
    /// it spawns are driven by the pool too. The returned handle settles with
    /// the outcome of the factory's handle, or as cancelled if the factory panics.
    pub fn offload<F, T, E>(&self, factory: F) -> AsyncHandle<T, E>
    where
        F: FnOnce() -> AsyncHandle<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        tracing::debug!("offloading computation factory to worker pool");
        self.spawn_outcome(async move { factory().await })
    }

    /// Blocks until the computation produced by `factory` on this pool settles,
    /// then unwraps its outcome.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::{convert::Infallible, time::Duration};
    /// use sync_bridge::{sleep, spawn, WorkerPool};
    ///
    /// let pool = WorkerPool::with_threads(1).unwrap();
    /// let answer = pool.wait_and_unwrap(|| {
    ///     spawn(async {
    ///         sleep(Duration::from_millis(10)).await;
    ///         Ok::<_, Infallible>(42)
    ///     })
    /// });
    /// assert_eq!(answer, Ok(42));
    /// ```
    pub fn wait_and_unwrap<F, T, E>(&self, factory: F) -> Result<T, WaitError<E>>
    where
        F: FnOnce() -> AsyncHandle<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        waiter::wait_and_unwrap(self.offload(factory))
    }
}

impl WorkerPool {
    /// Number of spawned computations that have not finished yet
    pub fn active_tasks(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }

    pub fn thread_count(&self) -> usize {
        self.inner.threads
    }

    /// Blocks until no computation is queued or being polled.
    ///
    /// Suspended computations are neither queued nor polled, so this can
    /// return while some are still pending.
    pub fn join(&self) {
        let pool = self.inner.pool.lock().clone();
        pool.join();
    }
}
