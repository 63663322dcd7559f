use std::env;

use crate::error::ConfigError;

/// Overrides the number of threads of the global worker pool
pub const WORKER_THREADS_ENV: &str = "SYNC_BRIDGE_WORKER_THREADS";
/// Overrides the stack size, in bytes, of the global worker pool's threads
pub const STACK_SIZE_ENV: &str = "SYNC_BRIDGE_STACK_SIZE";

/// Worker pool settings
///
/// The default uses as many threads as there are logical CPUs.
///
/// # Example
///
/// ```rust
/// use sync_bridge::{PoolConfig, WorkerPool};
///
/// let config = PoolConfig::default()
///     .with_worker_threads(2)
///     .with_thread_name("offload");
/// let pool = WorkerPool::new(config).unwrap();
/// assert_eq!(pool.thread_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads
    pub worker_threads: usize,
    /// Name given to every worker thread
    pub thread_name: String,
    /// Stack size of the worker threads, the platform default when `None`
    pub stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            thread_name: String::from("sync-bridge-worker"),
            stack_size: None,
        }
    }
}

impl PoolConfig {
    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == 0 {
            return Err(ConfigError::NoWorkerThreads);
        }
        Ok(())
    }

    /// Default settings with the environment overrides applied.
    ///
    /// Fails on the first override that is not a positive integer.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(worker_threads) = read_var(WORKER_THREADS_ENV)? {
            config.worker_threads = worker_threads;
        }
        if let Some(stack_size) = read_var(STACK_SIZE_ENV)? {
            config.stack_size = Some(stack_size);
        }
        config.validate()?;
        Ok(config)
    }

    /// Like [`PoolConfig::try_from_env`], but falls back to the defaults when an
    /// override is invalid
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|error| {
            tracing::warn!(%error, "ignoring worker pool environment overrides");
            Self::default()
        })
    }
}

fn read_var(var: &'static str) -> Result<Option<usize>, ConfigError> {
    let Ok(value) = env::var(var) else {
        return Ok(None);
    };
    match value.trim().parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        _ => Err(ConfigError::InvalidValue { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_threads() {
        let config = PoolConfig::default();
        assert!(config.worker_threads >= 1);
        assert_eq!(config.stack_size, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = PoolConfig::default().with_worker_threads(0);
        assert_eq!(config.validate(), Err(ConfigError::NoWorkerThreads));
    }

    #[test]
    fn setters_apply() {
        let config = PoolConfig::default()
            .with_worker_threads(3)
            .with_thread_name("io")
            .with_stack_size(1 << 20);
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.thread_name, "io");
        assert_eq!(config.stack_size, Some(1 << 20));
    }
}
