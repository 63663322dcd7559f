mod delay;
mod timer;

use std::time::Duration;

pub use self::delay::Delay;

/// Suspends the calling computation for at least `duration`.
///
/// Deadlines are kept by one shared timer thread, which wakes the computation
/// through whichever scheduler drives it, so a sleeping computation holds no
/// worker. Dropping the returned [`Delay`] removes its deadline.
///
/// Example
///
/// ```rust
/// use sync_bridge::{block_on, sleep};
/// use std::time::{Duration, Instant};
///
/// let started = Instant::now();
/// block_on(sleep(Duration::from_millis(20)));
/// assert!(started.elapsed() >= Duration::from_millis(20));
/// ```
pub fn sleep(duration: Duration) -> Delay {
    Delay::new(duration)
}
