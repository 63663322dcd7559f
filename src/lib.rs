//! Block synchronous code on an asynchronous computation, without starving
//! single-threaded calling contexts.
//!
//! A computation is represented by an [`AsyncHandle`], which settles exactly once
//! into a value, one or more faults, or cancellation (see [`Outcome`]). The
//! crate offers two ways for a thread to wait on one:
//!
//! * **Direct**: [`wait_and_unwrap`] on an existing handle blocks the calling
//!   thread until the handle settles.
//! * **Offloaded**: [`wait_and_unwrap`] on [`offload(factory)`](offload) first hands
//!   the factory to a [`WorkerPool`], which invokes it and drives the computation
//!   it starts, then blocks the caller on the result.
//!
//! # Why offload
//!
//! Computations are driven by the scheduler they were spawned on. When the
//! calling thread is itself that scheduler, as with a [`LocalContext`] or any
//! dispatcher that runs one piece of work at a time, blocking it on a computation
//! spawned there is a deadlock: the computation needs the blocked thread to
//! resume. Offloading starts the computation on the pool instead, so a free
//! thread always exists to drive it to completion.
//!
//! ```rust
//! use std::{convert::Infallible, time::Duration};
//! use sync_bridge::{offload, sleep, spawn, wait_and_unwrap, LocalContext};
//!
//! let context = LocalContext::new();
//! let value = context.run(|| {
//!     wait_and_unwrap(offload(|| {
//!         spawn(async {
//!             sleep(Duration::from_millis(10)).await;
//!             Ok::<_, Infallible>("resumed on the pool")
//!         })
//!     }))
//! });
//! assert_eq!(value, Ok("resumed on the pool"));
//! ```
//!
//! # Unwrapping
//!
//! * A value is returned as `Ok`.
//! * A cancelled computation returns [`WaitError::Cancelled`].
//! * A faulted computation returns [`WaitError::Faulted`] carrying its original
//!   error. When there are several, the first one in the handle's order is kept.
//!   For handles built with [`when_all`] that order is the input order of the
//!   members, regardless of which member failed first in time.
//!
//! # Warning
//! * Waiting has no timeout. A computation that never settles blocks the caller forever.
//! * Never wait from inside a computation driven by the scheduler it waits on.

mod config;
mod error;
mod executors;
mod handle;
mod outcome;
mod sleeper;
mod waiter;

pub use config::{PoolConfig, STACK_SIZE_ENV, WORKER_THREADS_ENV};
pub use error::{CancellationError, ConfigError, WaitError};
pub use executors::{block_on, LocalContext, WorkerPool};
pub use handle::{promise, spawn, spawn_outcome, when_all, AsyncHandle, Completer};
pub use outcome::{Faults, Outcome};
pub use sleeper::{sleep, Delay};
pub use waiter::{offload, wait_and_unwrap, Offload, Waitable};
