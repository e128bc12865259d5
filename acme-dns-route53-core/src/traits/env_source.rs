//! Environment variable source

use std::collections::HashMap;

/// Read-only view of environment variables.
///
/// Configuration resolution reads the environment only through this trait, so
/// the process environment can be swapped for a fixed map.
pub trait EnvSource: Send + Sync {
    /// Value of `key`; unset and empty variables both read as `None`.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}
