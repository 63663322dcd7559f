use std::{sync::Arc, task::Waker};

use cooked_waker::{IntoWaker, WakeRef};
use parking_lot::{Condvar, Mutex};

pub(crate) fn pair() -> (Arc<Suspender>, Waker) {
    let suspender = Arc::new(Suspender::new());
    let resumer = suspender.clone();
    (suspender, resumer.into_waker())
}

/// Parks a thread until its waker fires.
///
/// A wake that arrives before `suspend` is remembered, so the next `suspend`
/// returns immediately instead of missing it.
pub(crate) struct Suspender {
    lock: Mutex<State>,
    cvar: Condvar,
}

#[derive(PartialEq)]
enum State {
    Initial,
    Notified,
    Suspended,
}

impl Suspender {
    pub(crate) fn new() -> Suspender {
        Suspender {
            lock: Mutex::new(State::Initial),
            cvar: Condvar::new(),
        }
    }

    pub(crate) fn suspend(&self) {
        let mut lock = self.lock.lock();

        match *lock {
            State::Initial => {
                *lock = State::Suspended;
                while *lock == State::Suspended {
                    self.cvar.wait(&mut lock);
                }
                *lock = State::Initial;
            }
            // woken while we were polling, consume the notification
            State::Notified => {
                *lock = State::Initial;
            }
            State::Suspended => {
                unreachable!("a thread cannot suspend twice on the same suspender")
            }
        }
    }

    pub(crate) fn resume(&self) {
        let mut lock = self.lock.lock();

        match *lock {
            State::Initial => *lock = State::Notified,
            State::Suspended => {
                *lock = State::Notified;
                self.cvar.notify_one();
            }
            State::Notified => {}
        }
    }
}

impl WakeRef for Suspender {
    fn wake_by_ref(&self) {
        self.resume()
    }
}
