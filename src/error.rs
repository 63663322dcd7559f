use thiserror::Error;

/// The awaited computation was cancelled before it produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("the awaited computation was cancelled")]
pub struct CancellationError;

/// Error returned by the waiters when a computation does not settle with a value.
///
/// A faulted computation hands back its original error value unchanged in
/// [`WaitError::Faulted`]. When the computation carried several errors, only the
/// first one in the handle's error order is kept.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum WaitError<E> {
    /// The computation was cancelled
    #[error(transparent)]
    Cancelled(#[from] CancellationError),
    /// The computation faulted with this error
    #[error("{0}")]
    Faulted(E),
}

impl<E> WaitError<E> {
    /// Returns true if the computation was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaitError::Cancelled(_))
    }

    /// Borrows the error the computation faulted with, if any
    pub fn fault(&self) -> Option<&E> {
        match self {
            WaitError::Faulted(error) => Some(error),
            WaitError::Cancelled(_) => None,
        }
    }

    /// Consumes `self` and returns the error the computation faulted with, if any
    pub fn into_fault(self) -> Option<E> {
        match self {
            WaitError::Faulted(error) => Some(error),
            WaitError::Cancelled(_) => None,
        }
    }
}

/// Invalid worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A worker pool needs at least one thread
    #[error("a worker pool needs at least one thread")]
    NoWorkerThreads,
    /// An environment override could not be parsed
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}
