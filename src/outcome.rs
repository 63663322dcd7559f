use std::{iter, vec};

use crate::error::{CancellationError, WaitError};

/// A non-empty, ordered sequence of errors a computation faulted with.
///
/// The order is the order in which the producing scheduler reported the errors.
/// For an aggregated handle this is the input order of its members, never the
/// order in which they happened to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faults<E> {
    first: E,
    rest: Vec<E>,
}

impl<E> Faults<E> {
    /// A sequence holding a single error
    pub fn new(first: E) -> Self {
        Self {
            first,
            rest: vec![],
        }
    }

    /// Builds a sequence from `errors`, keeping their order.
    ///
    /// Returns `None` if `errors` is empty.
    pub fn from_vec(errors: Vec<E>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let first = errors.next()?;
        Some(Self {
            first,
            rest: errors.collect(),
        })
    }

    /// The error a waiter surfaces
    pub fn first(&self) -> &E {
        &self.first
    }

    /// Number of errors, always at least one
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        iter::once(&self.first).chain(self.rest.iter())
    }

    /// Appends `other` after the errors already held
    pub fn extend(&mut self, other: Faults<E>) {
        self.rest.push(other.first);
        self.rest.extend(other.rest);
    }

    /// Keeps the first error and discards the rest
    pub fn into_first(self) -> E {
        self.first
    }

    pub fn into_vec(self) -> Vec<E> {
        self.into_iter().collect()
    }
}

impl<E> IntoIterator for Faults<E> {
    type Item = E;
    type IntoIter = iter::Chain<iter::Once<E>, vec::IntoIter<E>>;

    fn into_iter(self) -> Self::IntoIter {
        iter::once(self.first).chain(self.rest)
    }
}

/// The terminal state of an asynchronous computation.
///
/// Exactly one variant applies and a settled computation never changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// Completed with a value
    Value(T),
    /// Faulted with one or more errors
    Faulted(Faults<E>),
    /// Cancelled before producing a value
    Cancelled,
}

impl<T, E> Outcome<T, E> {
    /// Faulted with a single error
    pub fn fault(error: E) -> Self {
        Outcome::Faulted(Faults::new(error))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self, Outcome::Faulted(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// Maps the value of a completed outcome
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U, E> {
        match self {
            Outcome::Value(value) => Outcome::Value(f(value)),
            Outcome::Faulted(faults) => Outcome::Faulted(faults),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }

    /// Unwraps the outcome into what a waiter hands back to its caller.
    ///
    /// A faulted outcome yields its first error; the others are dropped.
    pub fn into_result(self) -> Result<T, WaitError<E>> {
        match self {
            Outcome::Value(value) => Ok(value),
            Outcome::Faulted(faults) => Err(WaitError::Faulted(faults.into_first())),
            Outcome::Cancelled => Err(WaitError::Cancelled(CancellationError)),
        }
    }

    /// Combines the outcomes of several computations, given in their input order.
    ///
    /// * Any faults: every member's errors, concatenated in input order.
    /// * No faults but a cancelled member: cancelled.
    /// * Otherwise: all values, in input order.
    pub fn aggregate<I>(outcomes: I) -> Outcome<Vec<T>, E>
    where
        I: IntoIterator<Item = Outcome<T, E>>,
    {
        outcomes.into_iter().collect()
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(error) => Outcome::fault(error),
        }
    }
}

impl<T, E> FromIterator<Outcome<T, E>> for Outcome<Vec<T>, E> {
    fn from_iter<I: IntoIterator<Item = Outcome<T, E>>>(outcomes: I) -> Self {
        let mut values = vec![];
        let mut faults: Option<Faults<E>> = None;
        let mut cancelled = false;

        for outcome in outcomes {
            match outcome {
                Outcome::Value(value) => values.push(value),
                Outcome::Faulted(member_faults) => match faults.as_mut() {
                    Some(faults) => faults.extend(member_faults),
                    None => faults = Some(member_faults),
                },
                Outcome::Cancelled => cancelled = true,
            }
        }

        match (faults, cancelled) {
            (Some(faults), _) => Outcome::Faulted(faults),
            (None, true) => Outcome::Cancelled,
            (None, false) => Outcome::Value(values),
        }
    }
}
