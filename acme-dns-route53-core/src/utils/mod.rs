//! Utility module

pub mod cancellation;
