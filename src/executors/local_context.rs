use std::{collections::VecDeque, sync::Arc};

use parking_lot::{Condvar, Mutex};

use super::{
    current,
    task::{Schedule, Task},
};

/// A single-threaded execution context, in the manner of a UI dispatcher.
///
/// Computations spawned while [`LocalContext::run`] is executing are queued on
/// the context and only make progress while the thread that called `run` pumps
/// that queue, which it does once its body has returned. A body that blocks on
/// such a computation therefore never returns: the only thread able to drive
/// the computation is the one waiting for it. Offloading the computation with
/// [`offload`](crate::offload) moves it to a worker pool and avoids this.
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
/// use sync_bridge::{offload, spawn, wait_and_unwrap, LocalContext};
///
/// let context = LocalContext::new();
/// let value = context.run(|| {
///     // blocking on `spawn(..)` directly here would hang forever
///     wait_and_unwrap(offload(|| spawn(async { Ok::<_, Infallible>(5) })))
/// });
/// assert_eq!(value, Ok(5));
/// ```
#[derive(Default)]
pub struct LocalContext {
    queue: Arc<LocalQueue>,
}

#[derive(Default)]
struct LocalQueue {
    state: Mutex<QueueState>,
    cvar: Condvar,
}

#[derive(Default)]
struct QueueState {
    ready: VecDeque<Arc<Task>>,
    live: usize,
}

impl Schedule for LocalQueue {
    fn schedule(&self, task: Arc<Task>) {
        self.state.lock().ready.push_back(task);
        self.cvar.notify_one();
    }

    fn task_started(&self) {
        self.state.lock().live += 1;
    }

    fn task_finished(&self) {
        let mut state = self.state.lock();
        state.live = state.live.saturating_sub(1);
        if state.live == 0 {
            self.cvar.notify_one();
        }
    }
}

impl LocalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `body` with this context as the current scheduler, then drives the
    /// computations spawned on it until every one of them has finished.
    pub fn run<R>(&self, body: impl FnOnce() -> R) -> R {
        let _guard = current::enter(self.queue.clone());
        let result = body();
        self.pump();
        result
    }

    /// Number of computations spawned on this context that have not finished
    pub fn pending_tasks(&self) -> usize {
        self.queue.state.lock().live
    }

    fn pump(&self) {
        while let Some(task) = self.next_task() {
            task.run();
        }
    }

    fn next_task(&self) -> Option<Arc<Task>> {
        let mut state = self.queue.state.lock();
        loop {
            if let Some(task) = state.ready.pop_front() {
                return Some(task);
            }
            if state.live == 0 {
                return None;
            }
            self.queue.cvar.wait(&mut state);
        }
    }
}
