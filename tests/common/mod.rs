#![allow(dead_code)]

use std::{
    error::Error,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Once,
    },
};

use proptest::test_runner::Config as ProptestConfig;
use tracing_subscriber::fmt::format::FmtSpan;

static INIT_LOGGING: Once = Once::new();

/// Initialize test logging with trace-level output.
///
/// The first call wins; later calls are no-ops.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(false)
            .try_init();
    });
}

pub fn test_proptest_config(cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

/// An error whose identity can be checked after a round trip
#[derive(Debug, PartialEq, Eq)]
pub struct TaggedError {
    pub label: &'static str,
    pub serial: usize,
}

impl TaggedError {
    pub fn new(label: &'static str) -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        Self {
            label,
            serial: NEXT.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Display for TaggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.label, self.serial)
    }
}

impl Error for TaggedError {}

#[derive(Debug, PartialEq, Eq)]
pub struct FirstError;

impl fmt::Display for FirstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("first error")
    }
}

impl Error for FirstError {}

#[derive(Debug, PartialEq, Eq)]
pub struct SecondError;

impl fmt::Display for SecondError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("second error")
    }
}

impl Error for SecondError {}
