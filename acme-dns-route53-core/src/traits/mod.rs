//! Abstraction layer for platform-provided inputs

mod env_source;

pub use env_source::{EnvSource, ProcessEnv};
