use std::{
    future::Future,
    mem,
    pin::Pin,
    task::{Context, Poll},
};

use super::AsyncHandle;
use crate::outcome::Outcome;

/// Combines `handles` into one handle that settles once every member has settled.
///
/// The aggregated outcome follows the input order of `handles`, not the order
/// in which members settle:
///
/// * if any member faulted, the handle faults with the errors of all faulted
///   members, concatenated in input order, so a waiter surfaces the error of the
///   earliest faulted member;
/// * otherwise, if any member was cancelled, the handle is cancelled;
/// * otherwise it completes with every member's value, in input order.
///
/// No scheduler drives the aggregate: members are polled by whoever awaits it.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use sync_bridge::{sleep, spawn, wait_and_unwrap, when_all, WaitError};
///
/// let slow = spawn(async {
///     sleep(Duration::from_millis(50)).await;
///     Err::<(), _>("registered first")
/// });
/// let fast = spawn(async { Err::<(), _>("registered second") });
///
/// let error = wait_and_unwrap(when_all(vec![slow, fast])).unwrap_err();
/// assert_eq!(error, WaitError::Faulted("registered first"));
/// ```
pub fn when_all<T, E>(handles: Vec<AsyncHandle<T, E>>) -> AsyncHandle<Vec<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    AsyncHandle::derived(WhenAll {
        members: handles.into_iter().map(Member::Pending).collect(),
        finished: false,
    })
}

enum Member<T, E> {
    Pending(AsyncHandle<T, E>),
    Settled(Outcome<T, E>),
    Taken,
}

struct WhenAll<T, E> {
    members: Vec<Member<T, E>>,
    finished: bool,
}

// Members are moved in and out of the vector but never pinned in place.
impl<T, E> Unpin for WhenAll<T, E> {}

impl<T, E> Future for WhenAll<T, E> {
    type Output = Outcome<Vec<T>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.finished {
            panic!("`when_all` polled after it settled");
        }

        let mut all_settled = true;
        for member in this.members.iter_mut() {
            if let Member::Pending(handle) = member {
                match Pin::new(handle).poll(cx) {
                    Poll::Ready(outcome) => *member = Member::Settled(outcome),
                    Poll::Pending => all_settled = false,
                }
            }
        }

        if !all_settled {
            return Poll::Pending;
        }

        this.finished = true;
        let outcomes = this
            .members
            .iter_mut()
            .filter_map(|member| match mem::replace(member, Member::Taken) {
                Member::Settled(outcome) => Some(outcome),
                _ => None,
            });
        Poll::Ready(Outcome::aggregate(outcomes.collect::<Vec<_>>()))
    }
}
