use std::{cell::RefCell, sync::Arc};

use super::{
    task::{BoxedFuture, Schedule, Task},
    worker_pool::WorkerPool,
};

thread_local! {
    static CURRENT: RefCell<Option<Arc<dyn Schedule>>> = const { RefCell::new(None) };
}

/// Restores the previously installed scheduler when dropped
pub(crate) struct EnterGuard {
    previous: Option<Arc<dyn Schedule>>,
}

/// Installs `scheduler` as the current thread's scheduler until the guard drops
pub(crate) fn enter(scheduler: Arc<dyn Schedule>) -> EnterGuard {
    let previous = CURRENT.with(|current| current.borrow_mut().replace(scheduler));
    EnterGuard { previous }
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|current| *current.borrow_mut() = previous);
    }
}

/// Spawns onto the current scheduler, or the global worker pool when the
/// thread has none
pub(crate) fn spawn_boxed(future: BoxedFuture) {
    let scheduler = CURRENT
        .with(|current| current.borrow().clone())
        .unwrap_or_else(|| WorkerPool::global().scheduler());
    Task::spawn(future, scheduler);
}
