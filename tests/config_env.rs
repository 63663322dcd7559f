//! Environment overrides for the worker pool; kept in its own binary since it mutates the environment.

use sync_bridge::{ConfigError, PoolConfig, STACK_SIZE_ENV, WORKER_THREADS_ENV};

#[test]
fn environment_overrides() {
    std::env::set_var(WORKER_THREADS_ENV, "3");
    std::env::set_var(STACK_SIZE_ENV, "262144");
    let config = PoolConfig::try_from_env().unwrap();
    assert_eq!(config.worker_threads, 3);
    assert_eq!(config.stack_size, Some(262144));

    std::env::set_var(WORKER_THREADS_ENV, "zero");
    assert_eq!(
        PoolConfig::try_from_env(),
        Err(ConfigError::InvalidValue {
            var: WORKER_THREADS_ENV,
            value: String::from("zero"),
        })
    );
    assert_eq!(PoolConfig::from_env(), PoolConfig::default());

    std::env::remove_var(WORKER_THREADS_ENV);
    std::env::remove_var(STACK_SIZE_ENV);
}
