use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use super::timer::{TimerKey, TimerQueue};

/// Future returned by [`sleep`](crate::sleep)
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Delay {
    deadline: Instant,
    queue: Option<Arc<TimerQueue>>,
    key: Option<TimerKey>,
}

impl Delay {
    pub fn new(duration: Duration) -> Self {
        Self::on_queue(duration, TimerQueue::global())
    }

    fn on_queue(duration: Duration, queue: Option<Arc<TimerQueue>>) -> Self {
        Delay {
            deadline: Instant::now() + duration,
            queue,
            key: None,
        }
    }
}

impl Future for Delay {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if Instant::now() >= self.deadline {
            return Poll::Ready(());
        }

        let Some(queue) = self.queue.clone() else {
            cx.waker().wake_by_ref();
            return Poll::Pending;
        };

        let key = self.key;
        match key {
            Some(key) if !queue.update(key, cx.waker()) => {
                self.key = None;
                Poll::Ready(())
            }
            Some(_) => Poll::Pending,
            None => {
                self.key = Some(queue.register(self.deadline, cx.waker().clone()));
                Poll::Pending
            }
        }
    }
}

impl Drop for Delay {
    fn drop(&mut self) {
        if let (Some(queue), Some(key)) = (&self.queue, self.key.take()) {
            queue.cancel(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use futures_lite::future::poll_once;

    use super::*;
    use crate::block_on;

    #[test]
    fn dropping_pending_delays_releases_their_entries() {
        let queue = TimerQueue::start().unwrap();
        let mut delays: Vec<Delay> = (0..200)
            .map(|_| Delay::on_queue(Duration::from_secs(5), Some(queue.clone())))
            .collect();
        for delay in delays.iter_mut() {
            assert_eq!(block_on(poll_once(delay)), None);
        }
        assert_eq!(queue.pending(), 200);

        drop(delays);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn delay_completes_through_the_timer() {
        let queue = TimerQueue::start().unwrap();
        let started = Instant::now();
        block_on(Delay::on_queue(Duration::from_millis(20), Some(queue.clone())));
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn delay_without_a_timer_still_completes() {
        let started = Instant::now();
        block_on(Delay::on_queue(Duration::from_millis(20), None));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
