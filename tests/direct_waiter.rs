//! Blocking directly on a handle: values, faults, cancellation and timing of settlement.

mod common;

use std::{
    sync::{Arc, Barrier},
    thread,
    time::Duration,
};

use common::{init_test_logging, test_proptest_config, TaggedError};
use proptest::prelude::*;
use sync_bridge::{
    promise, spawn, wait_and_unwrap, AsyncHandle, CancellationError, Faults, Outcome, WaitError,
};

proptest! {
    #![proptest_config(test_proptest_config(64))]

    /// A settled value comes back unchanged.
    #[test]
    fn value_round_trips(value in any::<i64>()) {
        init_test_logging();
        let handle = AsyncHandle::<i64, TaggedError>::from_value(value);
        prop_assert_eq!(wait_and_unwrap(handle), Ok(value));
    }

    /// Strings survive the trip through a spawned computation too.
    #[test]
    fn spawned_value_round_trips(value in ".*") {
        init_test_logging();
        let expected = value.clone();
        let handle = spawn(async move { Ok::<_, TaggedError>(value) });
        prop_assert_eq!(wait_and_unwrap(handle), Ok(expected));
    }
}

#[test]
fn fault_is_returned_as_the_original_error() {
    init_test_logging();
    let error = TaggedError::new("broken pipe");
    let serial = error.serial;
    let handle = spawn(async move { Err::<(), _>(error) });

    let Err(WaitError::Faulted(returned)) = wait_and_unwrap(handle) else {
        panic!("expected a fault");
    };
    assert_eq!(returned.label, "broken pipe");
    assert_eq!(returned.serial, serial);
}

#[test]
fn boxed_fault_keeps_its_concrete_type() {
    init_test_logging();
    let handle = spawn(async {
        Err::<(), Box<dyn std::error::Error + Send + Sync>>(Box::new(TaggedError::new("typed")))
    });
    let error = wait_and_unwrap(handle).unwrap_err().into_fault().unwrap();
    let tagged = error.downcast::<TaggedError>().unwrap();
    assert_eq!(tagged.label, "typed");
}

#[test]
fn only_the_first_of_several_faults_is_surfaced() {
    init_test_logging();
    let first = TaggedError::new("first");
    let first_serial = first.serial;
    let faults = Faults::from_vec(vec![first, TaggedError::new("second")]).unwrap();
    let handle = AsyncHandle::<(), _>::from_faults(faults);

    let error = wait_and_unwrap(handle).unwrap_err().into_fault().unwrap();
    assert_eq!(error.serial, first_serial);
}

#[test]
fn cancelled_handle_yields_cancellation_only() {
    init_test_logging();
    let handle = AsyncHandle::<u8, TaggedError>::cancelled();
    assert_eq!(
        wait_and_unwrap(handle),
        Err(WaitError::Cancelled(CancellationError))
    );
}

#[test]
fn computation_cancelling_itself_yields_cancellation() {
    init_test_logging();
    let handle = sync_bridge::spawn_outcome(async { Outcome::<u8, TaggedError>::Cancelled });
    assert!(wait_and_unwrap(handle).unwrap_err().is_cancelled());
}

#[test]
fn abandoned_promise_yields_cancellation() {
    init_test_logging();
    let (completer, handle) = promise::<u8, TaggedError>();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        drop(completer);
    });
    assert!(wait_and_unwrap(handle).unwrap_err().is_cancelled());
}

#[test]
fn already_settled_and_concurrently_settled_behave_the_same() {
    init_test_logging();

    let (completer, settled_first) = promise::<u32, TaggedError>();
    completer.complete(11);
    assert!(settled_first.is_settled());

    let (completer, settled_later) = promise::<u32, TaggedError>();
    let barrier = Arc::new(Barrier::new(2));
    let settling = {
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            completer.complete(11);
        })
    };
    barrier.wait();
    let later = wait_and_unwrap(settled_later);
    settling.join().unwrap();

    assert_eq!(wait_and_unwrap(settled_first), later);
    assert_eq!(later, Ok(11));
}

#[test]
fn settling_races_with_the_wait_many_times() {
    init_test_logging();
    for round in 0..200u32 {
        let (completer, handle) = promise::<u32, TaggedError>();
        let settling = thread::spawn(move || completer.complete(round));
        assert_eq!(wait_and_unwrap(handle), Ok(round));
        settling.join().unwrap();
    }
}
