use std::{
    future::Future,
    panic::{catch_unwind, AssertUnwindSafe},
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll, Wake, Waker},
};

use parking_lot::Mutex;

use super::current;

pub(crate) type BoxedFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Something that can run tasks.
///
/// `schedule` is called every time a task becomes runnable; the scheduler must
/// eventually call [`Task::run`] on the thread it owns.
pub(crate) trait Schedule: Send + Sync + 'static {
    fn schedule(&self, task: Arc<Task>);

    fn task_started(&self) {}

    fn task_finished(&self) {}
}

/// A spawned future together with the scheduler that drives it
pub(crate) struct Task {
    future: Mutex<Option<BoxedFuture>>,
    scheduled: AtomicBool,
    scheduler: Arc<dyn Schedule>,
}

impl Task {
    pub(crate) fn spawn(future: BoxedFuture, scheduler: Arc<dyn Schedule>) {
        scheduler.task_started();
        let task = Arc::new(Task {
            future: Mutex::new(Some(future)),
            scheduled: AtomicBool::new(false),
            scheduler,
        });
        task.wake_by_ref();
    }

    /// Polls the future once with the task's scheduler installed as the current one
    pub(crate) fn run(self: Arc<Self>) {
        self.scheduled.store(false, Ordering::Release);
        let mut slot = self.future.lock();
        let Some(future) = slot.as_mut() else {
            return;
        };

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);
        let _guard = current::enter(self.scheduler.clone());
        match catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx))) {
            Ok(Poll::Pending) => return,
            Ok(Poll::Ready(())) => {
                tracing::trace!("task completed");
            }
            Err(_) => {
                tracing::error!("task panicked while being polled, dropping it");
            }
        }
        *slot = None;
        drop(slot);
        self.scheduler.task_finished();
    }
}

impl Wake for Task {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        if !self.scheduled.swap(true, Ordering::AcqRel) {
            self.scheduler.schedule(self.clone());
        }
    }
}
