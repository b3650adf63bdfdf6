//! Configuration module.
//!
//! Loads settings from environment variables with typed defaults.

mod env_file;
mod global;
mod settings;

pub use env_file::*;
pub use global::*;
pub use settings::*;

use std::num::ParseIntError;
use thiserror::Error;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid numeric configuration: {key}={value:?} is not a valid integer ({source})")]
    InvalidNumber {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("settings have already been initialized for this process")]
    AlreadyInitialized,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::env;
    use std::ffi::OsString;
    use std::sync::{Mutex, MutexGuard};

    /// Serializes tests that read or write the real process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the environment lock and restores the given keys on drop.
    pub struct EnvGuard {
        saved: Vec<(&'static str, Option<OsString>)>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        /// Lock the environment and clear `keys` for the duration of the test.
        pub fn clear(keys: &[&'static str]) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let saved = keys
                .iter()
                .map(|key| {
                    let old = env::var_os(key);
                    env::remove_var(key);
                    (*key, old)
                })
                .collect();
            Self { saved, _lock: lock }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, old) in &self.saved {
                match old {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
