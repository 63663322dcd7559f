use std::{
    future::Future,
    sync::Arc,
    task::{Context, Poll, Waker},
};

mod current;
mod local_context;
mod suspender;
mod task;
mod worker_pool;

pub(crate) use current::spawn_boxed;
pub use local_context::LocalContext;
pub use worker_pool::WorkerPool;

use suspender::{pair, Suspender};

/// Blocks the current thread until the future is polled to finish.
///
/// The future is polled on the calling thread only. Anything it waits on has
/// to be driven elsewhere (a worker pool, another thread, a timer), otherwise
/// this never returns.
///
/// Example
/// ```rust
/// let result = sync_bridge::block_on(async {
///     println!("This is an async executor");
///     1
/// });
/// assert_eq!(result, 1);
/// ```
///
pub fn block_on<Fut: Future>(future: Fut) -> Fut::Output {
    thread_local! {
        static PAIR: (Arc<Suspender>, Waker) = pair();
    }

    PAIR.with(move |(suspender, waker)| {
        futures_lite::pin!(future);
        let mut context: Context<'_> = Context::from_waker(waker);
        loop {
            match future.as_mut().poll(&mut context) {
                Poll::Pending => suspender.suspend(),
                Poll::Ready(output) => return output,
            }
        }
    })
}
