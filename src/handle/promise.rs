use std::{
    sync::Arc,
    task::{Context, Poll, Waker},
};

use parking_lot::Mutex;

use crate::outcome::{Faults, Outcome};

pub(super) struct Shared<T, E> {
    state: Mutex<State<T, E>>,
}

enum State<T, E> {
    Pending(Option<Waker>),
    Settled(Outcome<T, E>),
    Observed,
}

impl<T, E> Shared<T, E> {
    pub(super) fn new() -> Self {
        Self {
            state: Mutex::new(State::Pending(None)),
        }
    }

    pub(super) fn settled(outcome: Outcome<T, E>) -> Self {
        Self {
            state: Mutex::new(State::Settled(outcome)),
        }
    }

    fn settle(&self, outcome: Outcome<T, E>) {
        let waker = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, State::Settled(outcome)) {
                State::Pending(waker) => waker,
                // a completer settles once, so the state was pending
                previous => {
                    *state = previous;
                    None
                }
            }
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    pub(super) fn poll_outcome(&self, cx: &mut Context<'_>) -> Poll<Outcome<T, E>> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, State::Observed) {
            State::Settled(outcome) => Poll::Ready(outcome),
            State::Pending(waker) => {
                let waker = match waker {
                    Some(waker) if waker.will_wake(cx.waker()) => waker,
                    _ => cx.waker().clone(),
                };
                *state = State::Pending(Some(waker));
                Poll::Pending
            }
            State::Observed => panic!("`AsyncHandle` polled after it settled"),
        }
    }

    pub(super) fn is_settled(&self) -> bool {
        !matches!(*self.state.lock(), State::Pending(_))
    }
}

/// The settling side of a promise-backed [`AsyncHandle`](super::AsyncHandle).
///
/// Every settling method consumes the completer, so its handle settles at
/// most once. A completer dropped without settling cancels its handle.
pub struct Completer<T, E> {
    shared: Option<Arc<Shared<T, E>>>,
}

impl<T, E> Completer<T, E> {
    pub(super) fn new(shared: Arc<Shared<T, E>>) -> Self {
        Self {
            shared: Some(shared),
        }
    }

    /// Settles the handle with `outcome`
    pub fn settle(mut self, outcome: Outcome<T, E>) {
        if let Some(shared) = self.shared.take() {
            shared.settle(outcome);
        }
    }

    pub fn complete(self, value: T) {
        self.settle(Outcome::Value(value));
    }

    pub fn fault(self, error: E) {
        self.settle(Outcome::fault(error));
    }

    /// Faults the handle with every error in `faults`, keeping their order
    pub fn fault_all(self, faults: Faults<E>) {
        self.settle(Outcome::Faulted(faults));
    }

    pub fn cancel(self) {
        self.settle(Outcome::Cancelled);
    }
}

impl<T, E> Drop for Completer<T, E> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            tracing::trace!("completer dropped without settling, cancelling its handle");
            shared.settle(Outcome::Cancelled);
        }
    }
}
