use std::{
    collections::BTreeMap,
    io,
    sync::{Arc, OnceLock},
    task::Waker,
    thread,
    time::Instant,
};

use parking_lot::{Condvar, Mutex};

/// Key of a registered deadline; the sequence number keeps equal deadlines apart
pub(super) type TimerKey = (Instant, u64);

/// Deadline-ordered wakers served by a single background thread.
#[derive(Debug, Default)]
pub(super) struct TimerQueue {
    state: Mutex<Entries>,
    cvar: Condvar,
}

#[derive(Debug, Default)]
struct Entries {
    next_seq: u64,
    wakers: BTreeMap<TimerKey, Waker>,
}

impl TimerQueue {
    /// The process-wide queue, or `None` if its thread could not be started
    pub(super) fn global() -> Option<Arc<TimerQueue>> {
        static GLOBAL: OnceLock<Option<Arc<TimerQueue>>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| match TimerQueue::start() {
                Ok(queue) => Some(queue),
                Err(error) => {
                    tracing::error!(%error, "could not start timer thread, sleeps will busy-poll");
                    None
                }
            })
            .clone()
    }

    pub(super) fn start() -> io::Result<Arc<TimerQueue>> {
        let queue = Arc::new(TimerQueue::default());
        let driver = queue.clone();
        thread::Builder::new()
            .name(String::from("sync-bridge-timer"))
            .spawn(move || driver.drive())?;
        Ok(queue)
    }

    pub(super) fn register(&self, deadline: Instant, waker: Waker) -> TimerKey {
        let mut entries = self.state.lock();
        let key = (deadline, entries.next_seq);
        entries.next_seq += 1;
        let earliest = entries.wakers.keys().next().map_or(true, |first| key < *first);
        entries.wakers.insert(key, waker);
        drop(entries);
        if earliest {
            self.cvar.notify_one();
        }
        key
    }

    /// Swaps the waker of a pending entry. Returns false once the entry has fired.
    pub(super) fn update(&self, key: TimerKey, waker: &Waker) -> bool {
        match self.state.lock().wakers.get_mut(&key) {
            Some(current) => {
                if !current.will_wake(waker) {
                    *current = waker.clone();
                }
                true
            }
            None => false,
        }
    }

    pub(super) fn cancel(&self, key: TimerKey) {
        self.state.lock().wakers.remove(&key);
    }

    pub(super) fn pending(&self) -> usize {
        self.state.lock().wakers.len()
    }

    fn drive(&self) {
        let mut entries = self.state.lock();
        loop {
            let now = Instant::now();
            let mut expired = Vec::new();
            while let Some(entry) = entries.wakers.first_entry() {
                if entry.key().0 > now {
                    break;
                }
                expired.push(entry.remove());
            }

            if !expired.is_empty() {
                drop(entries);
                expired.into_iter().for_each(Waker::wake);
                entries = self.state.lock();
                continue;
            }

            match entries.wakers.keys().next().map(|key| key.0) {
                Some(deadline) => {
                    let _ = self.cvar.wait_until(&mut entries, deadline);
                }
                None => self.cvar.wait(&mut entries),
            }
        }
    }
}
